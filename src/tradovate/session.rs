use chrono::{DateTime, Utc};

/// An authenticated broker session, passed explicitly into every API
/// call. Validity is a function of `expiry` alone.
#[derive(Debug, Clone)]
pub struct BrokerSession {
    pub access_token: String,
    pub expiry: DateTime<Utc>,
    pub user_id: i64,
}

impl BrokerSession {
    pub fn is_valid(&self) -> bool {
        Utc::now() < self.expiry
    }
}
