use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// Length of generated candidate passwords.
pub const GENERATED_PASSWORD_LEN: usize = 10;

pub fn generate_password() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_password_is_alphanumeric_and_fixed_length() {
        let pw = generate_password();
        assert_eq!(pw.len(), GENERATED_PASSWORD_LEN);
        assert!(pw.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn consecutive_passwords_differ() {
        assert_ne!(generate_password(), generate_password());
    }
}
