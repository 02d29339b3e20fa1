//! Outbound mail adapters.

mod memory;

#[cfg(feature = "smtp")]
mod smtp;

pub use memory::InMemoryMailer;

#[cfg(feature = "smtp")]
pub use smtp::SmtpMailer;

/// SMTP relay settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Hide the local part of an address for logs: `jane@example.com` -> `j***@example.com`.
pub fn mask_email(address: &str) -> String {
    match address.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            format!("{first}***@{domain}")
        }
        None => "***".to_string(),
    }
}
