use std::collections::HashSet;

use serde_json::{json, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::data_api::DataApiClient;
use shared_models::records::{
    Appointment, Doctor, APPOINTMENTS_COLLECTION, DOCTORS_COLLECTION,
};
use shared_utils::jwt::mint_token;
use shared_utils::password::verify_password;

use crate::models::{DoctorDashboard, DoctorError, DoctorLoginRequest, DoctorProfileUpdate};

const TOKEN_TTL_HOURS: i64 = 24 * 7;
const DASHBOARD_LATEST: usize = 5;

/// The doctor console: login, appointment book, dashboard, own profile.
pub struct PracticeService {
    db: DataApiClient,
    jwt_secret: String,
}

impl PracticeService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DataApiClient::new(config),
            jwt_secret: config.jwt_secret.clone(),
        }
    }

    pub async fn login(&self, request: DoctorLoginRequest) -> Result<String, DoctorError> {
        let doctor: Doctor = self
            .db
            .find_one(DOCTORS_COLLECTION, json!({ "email": request.email }))
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?
            .ok_or(DoctorError::InvalidCredentials)?;

        let valid = verify_password(&request.password, &doctor.password)
            .map_err(|e| DoctorError::Database(e.to_string()))?;
        if !valid {
            return Err(DoctorError::InvalidCredentials);
        }

        debug!("Doctor {} logged in", doctor.id);

        mint_token(
            &doctor.id.to_string(),
            "doctor",
            Some(&doctor.email),
            &self.jwt_secret,
            TOKEN_TTL_HOURS,
        )
        .map_err(DoctorError::Validation)
    }

    pub async fn list_appointments(&self, doctor_id: &str) -> Result<Vec<Appointment>, DoctorError> {
        self.db
            .find(
                APPOINTMENTS_COLLECTION,
                json!({ "doctor_id": doctor_id }),
                Some(json!({ "booked_at": -1 })),
                None,
            )
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))
    }

    pub async fn complete_appointment(
        &self,
        doctor_id: &str,
        appointment_id: Uuid,
    ) -> Result<(), DoctorError> {
        let appointment = self.owned_appointment(doctor_id, appointment_id).await?;

        if appointment.cancelled {
            return Err(DoctorError::CompletingCancelled);
        }

        self.db
            .update_one(
                APPOINTMENTS_COLLECTION,
                json!({ "_id": appointment_id.to_string() }),
                json!({ "$set": { "is_completed": true } }),
            )
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        info!("Doctor {} completed appointment {}", doctor_id, appointment_id);
        Ok(())
    }

    pub async fn cancel_appointment(
        &self,
        doctor_id: &str,
        appointment_id: Uuid,
    ) -> Result<(), DoctorError> {
        let appointment = self.owned_appointment(doctor_id, appointment_id).await?;

        if appointment.cancelled {
            return Err(DoctorError::AlreadyCancelled);
        }

        self.db
            .update_one(
                APPOINTMENTS_COLLECTION,
                json!({ "_id": appointment_id.to_string() }),
                json!({ "$set": { "cancelled": true } }),
            )
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        info!("Doctor {} cancelled appointment {}", doctor_id, appointment_id);

        // Slot release is a second, independent write.
        if let Err(e) = self.release_slot(&appointment).await {
            warn!(
                "Failed to release slot for cancelled appointment {}: {}",
                appointment_id, e
            );
        }

        Ok(())
    }

    pub async fn dashboard(&self, doctor_id: &str) -> Result<DoctorDashboard, DoctorError> {
        let appointments = self.list_appointments(doctor_id).await?;

        let earnings = appointments
            .iter()
            .filter(|a| a.payment || a.is_completed)
            .map(|a| a.amount)
            .sum();

        let patients: HashSet<Uuid> = appointments.iter().map(|a| a.user_id).collect();

        let latest_appointments = appointments.iter().take(DASHBOARD_LATEST).cloned().collect();

        Ok(DoctorDashboard {
            earnings,
            appointments: appointments.len(),
            patients: patients.len(),
            latest_appointments,
        })
    }

    pub async fn set_availability(&self, doctor_id: &str) -> Result<bool, DoctorError> {
        let doctor = self.find_doctor(doctor_id).await?;
        let next = !doctor.available;

        self.db
            .update_one(
                DOCTORS_COLLECTION,
                json!({ "_id": doctor_id }),
                json!({ "$set": { "available": next } }),
            )
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        info!("Doctor {} availability toggled to {}", doctor_id, next);
        Ok(next)
    }

    pub async fn get_profile(&self, doctor_id: &str) -> Result<Value, DoctorError> {
        let doctor = self.find_doctor(doctor_id).await?;
        Ok(doctor.sanitized())
    }

    pub async fn update_profile(
        &self,
        doctor_id: &str,
        update: DoctorProfileUpdate,
    ) -> Result<(), DoctorError> {
        let mut fields = serde_json::Map::new();

        if let Some(fees) = update.fees {
            if fees < 0 {
                return Err(DoctorError::Validation("Fees cannot be negative".to_string()));
            }
            fields.insert("fees".to_string(), json!(fees));
        }
        if let Some(address) = update.address {
            fields.insert("address".to_string(), json!(address));
        }
        if let Some(about) = update.about {
            fields.insert("about".to_string(), json!(about));
        }
        if let Some(available) = update.available {
            fields.insert("available".to_string(), json!(available));
        }

        if fields.is_empty() {
            return Err(DoctorError::Validation("No fields to update".to_string()));
        }

        let matched = self
            .db
            .update_one(
                DOCTORS_COLLECTION,
                json!({ "_id": doctor_id }),
                json!({ "$set": Value::Object(fields) }),
            )
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        if matched == 0 {
            return Err(DoctorError::DoctorNotFound);
        }

        info!("Doctor {} updated profile", doctor_id);
        Ok(())
    }

    async fn find_doctor(&self, doctor_id: &str) -> Result<Doctor, DoctorError> {
        self.db
            .find_one(DOCTORS_COLLECTION, json!({ "_id": doctor_id }))
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?
            .ok_or(DoctorError::DoctorNotFound)
    }

    async fn owned_appointment(
        &self,
        doctor_id: &str,
        appointment_id: Uuid,
    ) -> Result<Appointment, DoctorError> {
        let appointment: Appointment = self
            .db
            .find_one(
                APPOINTMENTS_COLLECTION,
                json!({ "_id": appointment_id.to_string() }),
            )
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?
            .ok_or(DoctorError::AppointmentNotFound)?;

        if appointment.doctor_id.to_string() != doctor_id {
            return Err(DoctorError::NotOwner);
        }

        Ok(appointment)
    }

    async fn release_slot(&self, appointment: &Appointment) -> Result<(), DoctorError> {
        let mut doctor = self.find_doctor(&appointment.doctor_id.to_string()).await?;
        doctor.release_slot(&appointment.slot_date, &appointment.slot_time);

        self.db
            .update_one(
                DOCTORS_COLLECTION,
                json!({ "_id": doctor.id.to_string() }),
                json!({ "$set": { "slots_booked": doctor.slots_booked } }),
            )
            .await
            .map_err(|e| DoctorError::Database(e.to_string()))?;

        Ok(())
    }
}
