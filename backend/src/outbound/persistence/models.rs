//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::domain::{DoctorId, DoctorProfile, UserAccount, UserId};

use super::schema::{atenciones, doctores, laboratorios, pacientes, tratamientos, usuarios};

/// Row struct for reading from `usuarios`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = usuarios)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id_usuario: i32,
    pub email: String,
    pub password: String,
    pub rol: String,
}

impl From<UserRow> for UserAccount {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id_usuario),
            email: row.email,
            password_hash: row.password,
            role: row.rol,
        }
    }
}

/// Row struct for reading from `doctores`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = doctores)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DoctorRow {
    pub id_doctor: i32,
    pub nombre_completo: String,
    pub rut: String,
    pub id_usuario: i32,
}

impl From<DoctorRow> for DoctorProfile {
    fn from(row: DoctorRow) -> Self {
        Self {
            id: DoctorId::new(row.id_doctor),
            full_name: row.nombre_completo,
            rut: row.rut,
            user_id: UserId::new(row.id_usuario),
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = usuarios)]
pub(crate) struct NewUserRow<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub rol: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = doctores)]
pub(crate) struct NewDoctorRow<'a> {
    pub nombre_completo: &'a str,
    pub rut: &'a str,
    pub id_usuario: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pacientes)]
pub(crate) struct NewPatientRow<'a> {
    pub nombre_completo: &'a str,
    pub rut: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = atenciones)]
pub(crate) struct NewVisitRow {
    pub fecha_atencion: NaiveDate,
    pub id_doctor: i32,
    pub id_paciente: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tratamientos)]
pub(crate) struct NewTreatmentRow<'a> {
    pub nombre_tratamiento: &'a str,
    pub costo_tratamiento: i32,
    pub id_atencion: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = laboratorios)]
pub(crate) struct NewLabRow<'a> {
    pub nombre_laboratorio: &'a str,
    pub costo_laboratorio: i32,
    pub id_tratamiento: i32,
}
