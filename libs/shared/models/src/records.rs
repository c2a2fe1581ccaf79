use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const USERS_COLLECTION: &str = "users";
pub const DOCTORS_COLLECTION: &str = "doctors";
pub const APPOINTMENTS_COLLECTION: &str = "appointments";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    pub line2: String,
}

/// Patient account document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: String,
    pub phone: String,
    pub address: Address,
    pub gender: String,
    pub dob: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Listing view with the password hash elided.
    pub fn sanitized(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(map) = value.as_object_mut() {
            map.remove("password");
        }
        value
    }
}

/// Doctor document. `slots_booked` maps a `D_M_YYYY` date key to the list of
/// time strings already taken on that day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password: String,
    pub image: String,
    pub speciality: String,
    pub degree: String,
    pub experience: String,
    pub about: String,
    /// Consultation fee in minor currency units.
    pub fees: i64,
    pub available: bool,
    pub address: Address,
    #[serde(default)]
    pub slots_booked: HashMap<String, Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl Doctor {
    pub fn is_slot_taken(&self, slot_date: &str, slot_time: &str) -> bool {
        self.slots_booked
            .get(slot_date)
            .map(|times| times.iter().any(|t| t == slot_time))
            .unwrap_or(false)
    }

    pub fn book_slot(&mut self, slot_date: &str, slot_time: &str) {
        self.slots_booked
            .entry(slot_date.to_string())
            .or_default()
            .push(slot_time.to_string());
    }

    pub fn release_slot(&mut self, slot_date: &str, slot_time: &str) {
        if let Some(times) = self.slots_booked.get_mut(slot_date) {
            times.retain(|t| t != slot_time);
            if times.is_empty() {
                self.slots_booked.remove(slot_date);
            }
        }
    }

    /// Listing view with the password hash elided.
    pub fn sanitized(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(map) = value.as_object_mut() {
            map.remove("password");
        }
        value
    }

    /// Directory view for the public doctor list: no password, no email.
    pub fn public_view(&self) -> serde_json::Value {
        let mut value = self.sanitized();
        if let Some(map) = value.as_object_mut() {
            map.remove("email");
        }
        value
    }
}

/// Booking record linking a patient and a doctor to one slot. The patient and
/// doctor documents are snapshotted at booking time for listing screens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: Uuid,
    pub doctor_id: Uuid,
    pub slot_date: String,
    pub slot_time: String,
    pub user_snapshot: serde_json::Value,
    pub doctor_snapshot: serde_json::Value,
    /// Amount due in minor currency units, copied from the doctor's fee.
    pub amount: i64,
    pub payment: bool,
    pub cancelled: bool,
    pub is_completed: bool,
    pub booked_at: DateTime<Utc>,
}
