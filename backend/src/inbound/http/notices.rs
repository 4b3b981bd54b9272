//! User-facing notices shown through the session's one-shot slot.

/// Unknown email or wrong password.
pub const INVALID_CREDENTIALS: &str = "Correo o contraseña incorrectos.";
/// Protected page visited without a session.
pub const LOGIN_REQUIRED: &str = "Por favor, inicia sesión para acceder.";
/// Session role is neither doctor nor administrator.
pub const UNRECOGNISED_ROLE: &str = "Rol de usuario no reconocido.";
/// Signed in, but not as a doctor.
pub const UNAUTHORISED_ACCESS: &str = "Acceso no autorizado.";
/// Visit committed.
pub const VISIT_SAVED: &str = "¡Atención guardada con éxito!";
/// Shown after logout.
pub const LOGGED_OUT: &str = "Has cerrado sesión exitosamente.";
/// Database unreachable.
pub const SERVICE_UNAVAILABLE: &str =
    "No fue posible conectar con la base de datos. Intenta nuevamente en unos minutos.";
/// Catch-all for internal failures.
pub const UNEXPECTED_ERROR: &str = "Ocurrió un error inesperado.";

/// Notice for a failed visit submission.
#[must_use]
pub fn visit_failed(message: &str) -> String {
    format!("Error al guardar la atención: {message}")
}
