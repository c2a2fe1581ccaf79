use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::data_api::DataApiClient;
use shared_models::records::{
    Appointment, Doctor, User, APPOINTMENTS_COLLECTION, DOCTORS_COLLECTION, USERS_COLLECTION,
};

use crate::models::{AdminDashboard, AdminError};

const DASHBOARD_LATEST: usize = 5;

/// Platform-wide reads and interventions available to the admin.
pub struct OversightService {
    db: DataApiClient,
}

impl OversightService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DataApiClient::new(config),
        }
    }

    pub async fn list_doctors(&self) -> Result<Vec<Value>, AdminError> {
        let doctors: Vec<Doctor> = self
            .db
            .find(
                DOCTORS_COLLECTION,
                json!({}),
                Some(json!({ "created_at": -1 })),
                None,
            )
            .await
            .map_err(|e| AdminError::Database(e.to_string()))?;

        Ok(doctors.iter().map(Doctor::sanitized).collect())
    }

    pub async fn toggle_availability(&self, doctor_id: Uuid) -> Result<bool, AdminError> {
        let doctor: Doctor = self
            .db
            .find_one(DOCTORS_COLLECTION, json!({ "_id": doctor_id.to_string() }))
            .await
            .map_err(|e| AdminError::Database(e.to_string()))?
            .ok_or(AdminError::DoctorNotFound)?;

        let next = !doctor.available;
        self.db
            .update_one(
                DOCTORS_COLLECTION,
                json!({ "_id": doctor_id.to_string() }),
                json!({ "$set": { "available": next } }),
            )
            .await
            .map_err(|e| AdminError::Database(e.to_string()))?;

        info!("Admin toggled doctor {} availability to {}", doctor_id, next);
        Ok(next)
    }

    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, AdminError> {
        self.db
            .find(
                APPOINTMENTS_COLLECTION,
                json!({}),
                Some(json!({ "booked_at": -1 })),
                None,
            )
            .await
            .map_err(|e| AdminError::Database(e.to_string()))
    }

    /// Cancels any appointment on the platform. Ownership checks do not apply
    /// to the admin.
    pub async fn cancel_appointment(&self, appointment_id: Uuid) -> Result<(), AdminError> {
        let appointment: Appointment = self
            .db
            .find_one(
                APPOINTMENTS_COLLECTION,
                json!({ "_id": appointment_id.to_string() }),
            )
            .await
            .map_err(|e| AdminError::Database(e.to_string()))?
            .ok_or(AdminError::AppointmentNotFound)?;

        if appointment.cancelled {
            return Err(AdminError::AlreadyCancelled);
        }

        self.db
            .update_one(
                APPOINTMENTS_COLLECTION,
                json!({ "_id": appointment_id.to_string() }),
                json!({ "$set": { "cancelled": true } }),
            )
            .await
            .map_err(|e| AdminError::Database(e.to_string()))?;

        info!("Admin cancelled appointment {}", appointment_id);

        // Slot release is a second, independent write.
        if let Err(e) = self.release_slot(&appointment).await {
            warn!(
                "Failed to release slot for cancelled appointment {}: {}",
                appointment_id, e
            );
        }

        Ok(())
    }

    pub async fn dashboard(&self) -> Result<AdminDashboard, AdminError> {
        let doctors: Vec<Doctor> = self
            .db
            .find(DOCTORS_COLLECTION, json!({}), None, None)
            .await
            .map_err(|e| AdminError::Database(e.to_string()))?;

        let patients: Vec<User> = self
            .db
            .find(USERS_COLLECTION, json!({}), None, None)
            .await
            .map_err(|e| AdminError::Database(e.to_string()))?;

        let appointments = self.list_appointments().await?;

        let latest_appointments = appointments.iter().take(DASHBOARD_LATEST).cloned().collect();

        Ok(AdminDashboard {
            doctors: doctors.len(),
            patients: patients.len(),
            appointments: appointments.len(),
            latest_appointments,
        })
    }

    async fn release_slot(&self, appointment: &Appointment) -> Result<(), AdminError> {
        let mut doctor: Doctor = self
            .db
            .find_one(
                DOCTORS_COLLECTION,
                json!({ "_id": appointment.doctor_id.to_string() }),
            )
            .await
            .map_err(|e| AdminError::Database(e.to_string()))?
            .ok_or(AdminError::DoctorNotFound)?;

        doctor.release_slot(&appointment.slot_date, &appointment.slot_time);

        self.db
            .update_one(
                DOCTORS_COLLECTION,
                json!({ "_id": doctor.id.to_string() }),
                json!({ "$set": { "slots_booked": doctor.slots_booked } }),
            )
            .await
            .map_err(|e| AdminError::Database(e.to_string()))?;

        Ok(())
    }
}
