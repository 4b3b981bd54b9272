//! Diesel table definitions for the clinic schema.
//!
//! These definitions must match `backend/migrations` exactly. PostgreSQL folds
//! the unquoted table names (`Usuarios`, `Pacientes`, ...) to lower case.

diesel::table! {
    /// Staff login accounts.
    usuarios (id_usuario) {
        id_usuario -> Int4,
        /// Unique login email.
        email -> Varchar,
        /// Argon2 PHC hash; never plaintext.
        password -> Varchar,
        /// `doctor` or `admin`; other values are rejected at the dashboard.
        rol -> Varchar,
    }
}

diesel::table! {
    /// Doctor profiles, one per doctor-role account.
    doctores (id_doctor) {
        id_doctor -> Int4,
        nombre_completo -> Varchar,
        rut -> Varchar,
        id_usuario -> Int4,
    }
}

diesel::table! {
    /// Patients, unique by rut.
    pacientes (id_paciente) {
        id_paciente -> Int4,
        nombre_completo -> Varchar,
        rut -> Varchar,
    }
}

diesel::table! {
    /// One row per recorded visit.
    atenciones (id_atencion) {
        id_atencion -> Int4,
        fecha_atencion -> Date,
        id_doctor -> Int4,
        id_paciente -> Int4,
    }
}

diesel::table! {
    tratamientos (id_tratamiento) {
        id_tratamiento -> Int4,
        nombre_tratamiento -> Varchar,
        costo_tratamiento -> Int4,
        id_atencion -> Int4,
    }
}

diesel::table! {
    laboratorios (id_laboratorio) {
        id_laboratorio -> Int4,
        nombre_laboratorio -> Varchar,
        costo_laboratorio -> Int4,
        id_tratamiento -> Int4,
    }
}

diesel::joinable!(doctores -> usuarios (id_usuario));
diesel::joinable!(atenciones -> doctores (id_doctor));
diesel::joinable!(atenciones -> pacientes (id_paciente));
diesel::joinable!(tratamientos -> atenciones (id_atencion));
diesel::joinable!(laboratorios -> tratamientos (id_tratamiento));

diesel::allow_tables_to_appear_in_same_query!(
    usuarios,
    doctores,
    pacientes,
    atenciones,
    tratamientos,
    laboratorios,
);
