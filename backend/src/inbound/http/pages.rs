//! Server-rendered HTML pages.
//!
//! Every interpolated value passes through [`escape`]; notices and names come
//! from user input or the database.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

fn layout(title: &str, notice: Option<&str>, body: &str) -> String {
    let notice = notice
        .map(|text| format!("<p class=\"aviso\" role=\"status\">{}</p>\n", escape(text)))
        .unwrap_or_default();
    format!(
        "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n{notice}{body}\n</body>\n</html>\n",
        title = escape(title),
    )
}

/// Wrap rendered markup in an HTML response with the given status.
pub fn html(status: StatusCode, markup: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(markup)
}

/// Login form.
pub fn login_page(notice: Option<&str>) -> String {
    layout(
        "Iniciar sesión",
        notice,
        "<h1>Iniciar sesión</h1>\n\
         <form method=\"post\" action=\"/login\">\n\
         <label>Correo <input type=\"email\" name=\"email\" required></label>\n\
         <label>Contraseña <input type=\"password\" name=\"password\" required></label>\n\
         <button type=\"submit\">Ingresar</button>\n\
         </form>",
    )
}

/// Doctor landing page.
pub fn doctor_dashboard(display_name: &str, notice: Option<&str>) -> String {
    let body = format!(
        "<h1>Bienvenido, Dr. {}</h1>\n\
         <nav>\n<a href=\"/crear_atencion\">Registrar atención</a>\n\
         <a href=\"/logout\">Cerrar sesión</a>\n</nav>",
        escape(display_name)
    );
    layout("Panel", notice, &body)
}

/// Admin placeholder page.
pub fn admin_dashboard() -> String {
    "<h1>Bienvenido, Admin!</h1>".to_owned()
}

/// Visit form. Always rendered empty.
pub fn visit_form(notice: Option<&str>) -> String {
    layout(
        "Registrar atención",
        notice,
        "<h1>Registrar atención</h1>\n\
         <form method=\"post\" action=\"/crear_atencion\">\n\
         <fieldset><legend>Paciente</legend>\n\
         <label>Nombre <input name=\"paciente_nombre\" required></label>\n\
         <label>RUT <input name=\"paciente_rut\" required></label>\n\
         </fieldset>\n\
         <label>Fecha <input type=\"date\" name=\"fecha_atencion\" required></label>\n\
         <fieldset><legend>Tratamiento</legend>\n\
         <label>Nombre <input name=\"tratamiento_nombre\" required></label>\n\
         <label>Costo <input type=\"number\" min=\"0\" name=\"tratamiento_costo\" required></label>\n\
         </fieldset>\n\
         <fieldset><legend>Laboratorio</legend>\n\
         <label><input type=\"checkbox\" name=\"hubo_laboratorio\"> Hubo laboratorio</label>\n\
         <label>Nombre <input name=\"lab_nombre\"></label>\n\
         <label>Costo <input type=\"number\" min=\"0\" name=\"lab_costo\"></label>\n\
         </fieldset>\n\
         <button type=\"submit\">Guardar</button>\n\
         </form>\n\
         <a href=\"/panel\">Volver al panel</a>",
    )
}

/// Generic error page.
pub fn error_page(status: StatusCode, message: &str, trace_id: Option<&str>) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    let trace = trace_id
        .map(|id| format!("\n<p><small>Referencia: <code>{}</code></small></p>", escape(id)))
        .unwrap_or_default();
    let body = format!(
        "<h1>{} {}</h1>\n<p>{}</p>{trace}\n<a href=\"/login\">Volver</a>",
        status.as_u16(),
        escape(reason),
        escape(message),
    );
    layout(reason, None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("plain", "plain")]
    #[case("<script>", "&lt;script&gt;")]
    #[case("a & \"b\" 'c'", "a &amp; &quot;b&quot; &#x27;c&#x27;")]
    fn escapes_markup(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(escape(raw), expected);
    }

    #[rstest]
    fn dashboard_escapes_the_name_and_shows_the_notice() {
        let page = doctor_dashboard("<b>Ana</b>", Some("¡Atención guardada con éxito!"));
        assert!(page.contains("Bienvenido, Dr. &lt;b&gt;Ana&lt;/b&gt;"));
        assert!(page.contains("¡Atención guardada con éxito!"));
    }

    #[rstest]
    fn visit_form_names_every_field() {
        let page = visit_form(None);
        for field in [
            "paciente_nombre",
            "paciente_rut",
            "fecha_atencion",
            "tratamiento_nombre",
            "tratamiento_costo",
            "hubo_laboratorio",
            "lab_nombre",
            "lab_costo",
        ] {
            assert!(page.contains(&format!("name=\"{field}\"")), "missing {field}");
        }
        assert!(!page.contains("class=\"aviso\""));
    }

    #[rstest]
    fn error_page_carries_the_trace_reference() {
        let page = error_page(StatusCode::SERVICE_UNAVAILABLE, "db down", Some("abc-123"));
        assert!(page.contains("503 Service Unavailable"));
        assert!(page.contains("abc-123"));
    }
}
