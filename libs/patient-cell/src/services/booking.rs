use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::data_api::DataApiClient;
use shared_models::records::{
    Appointment, Doctor, User, APPOINTMENTS_COLLECTION, DOCTORS_COLLECTION, USERS_COLLECTION,
};

use crate::models::{BookAppointmentRequest, PatientError};

/// Slot booking and cancellation for the patient role.
pub struct BookingService {
    db: DataApiClient,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: DataApiClient::new(config),
        }
    }

    pub async fn book_appointment(
        &self,
        user_id: &str,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, PatientError> {
        let mut doctor: Doctor = self
            .db
            .find_one(
                DOCTORS_COLLECTION,
                json!({ "_id": request.doctor_id.to_string() }),
            )
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?
            .ok_or(PatientError::DoctorNotFound)?;

        if !doctor.available {
            return Err(PatientError::DoctorUnavailable);
        }

        if doctor.is_slot_taken(&request.slot_date, &request.slot_time) {
            return Err(PatientError::SlotTaken);
        }

        let user: User = self
            .db
            .find_one(USERS_COLLECTION, json!({ "_id": user_id }))
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?
            .ok_or(PatientError::UserNotFound)?;

        doctor.book_slot(&request.slot_date, &request.slot_time);
        self.db
            .update_one(
                DOCTORS_COLLECTION,
                json!({ "_id": doctor.id.to_string() }),
                json!({ "$set": { "slots_booked": doctor.slots_booked } }),
            )
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        // The snapshots feed listing screens without further lookups. The
        // doctor copy drops the slot map, which is both large and volatile.
        let mut doctor_snapshot = doctor.sanitized();
        if let Some(map) = doctor_snapshot.as_object_mut() {
            map.remove("slots_booked");
        }

        let appointment = Appointment {
            id: Uuid::new_v4(),
            user_id: user.id,
            doctor_id: doctor.id,
            slot_date: request.slot_date,
            slot_time: request.slot_time,
            user_snapshot: user.sanitized(),
            doctor_snapshot,
            amount: doctor.fees,
            payment: false,
            cancelled: false,
            is_completed: false,
            booked_at: Utc::now(),
        };

        let document =
            serde_json::to_value(&appointment).map_err(|e| PatientError::Database(e.to_string()))?;
        self.db
            .insert_one(APPOINTMENTS_COLLECTION, document)
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        info!(
            "Booked appointment {} for patient {} with doctor {} at {} {}",
            appointment.id, user.id, doctor.id, appointment.slot_date, appointment.slot_time
        );
        Ok(appointment)
    }

    pub async fn list_appointments(&self, user_id: &str) -> Result<Vec<Appointment>, PatientError> {
        self.db
            .find(
                APPOINTMENTS_COLLECTION,
                json!({ "user_id": user_id }),
                Some(json!({ "booked_at": -1 })),
                None,
            )
            .await
            .map_err(|e| PatientError::Database(e.to_string()))
    }

    pub async fn cancel_appointment(
        &self,
        user_id: &str,
        appointment_id: Uuid,
    ) -> Result<(), PatientError> {
        let appointment: Appointment = self
            .db
            .find_one(
                APPOINTMENTS_COLLECTION,
                json!({ "_id": appointment_id.to_string() }),
            )
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?
            .ok_or(PatientError::AppointmentNotFound)?;

        if appointment.user_id.to_string() != user_id {
            return Err(PatientError::NotOwner);
        }
        if appointment.cancelled {
            return Err(PatientError::AlreadyCancelled);
        }

        self.db
            .update_one(
                APPOINTMENTS_COLLECTION,
                json!({ "_id": appointment_id.to_string() }),
                json!({ "$set": { "cancelled": true } }),
            )
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        info!("Patient {} cancelled appointment {}", user_id, appointment_id);

        // Second, independent write: releasing the slot is not coupled to the
        // cancellation flag. A failure here leaves the slot blocked but the
        // appointment cancelled.
        if let Err(e) = self.release_slot(&appointment).await {
            warn!(
                "Failed to release slot for cancelled appointment {}: {}",
                appointment_id, e
            );
        }

        Ok(())
    }

    async fn release_slot(&self, appointment: &Appointment) -> Result<(), PatientError> {
        let mut doctor: Doctor = self
            .db
            .find_one(
                DOCTORS_COLLECTION,
                json!({ "_id": appointment.doctor_id.to_string() }),
            )
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?
            .ok_or(PatientError::DoctorNotFound)?;

        doctor.release_slot(&appointment.slot_date, &appointment.slot_time);

        self.db
            .update_one(
                DOCTORS_COLLECTION,
                json!({ "_id": doctor.id.to_string() }),
                json!({ "$set": { "slots_booked": doctor.slots_booked } }),
            )
            .await
            .map_err(|e| PatientError::Database(e.to_string()))?;

        Ok(())
    }
}
