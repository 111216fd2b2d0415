//! # Fingerprint
//!
//! Low-entropy submitter identity for the guestbook. It only raises the
//! cost of casual re-submission and is not a security boundary: every input
//! is visible to and forgeable by the client.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientTraits {
    pub user_agent: String,
    pub language: String,
    pub timezone_offset_minutes: i32,
    pub screen_width: u32,
    pub screen_height: u32,
    pub color_depth: u32,
}

impl ClientTraits {
    pub fn fingerprint(&self) -> String {
        let data = [
            self.user_agent.clone(),
            self.language.clone(),
            self.timezone_offset_minutes.to_string(),
            format!("{}x{}", self.screen_width, self.screen_height),
            self.color_depth.to_string(),
        ]
        .join("|");

        to_base36(hash(&data))
    }
}

/// 32-bit `h * 31 + unit` over UTF-16 code units, wrapping.
fn hash(data: &str) -> i32 {
    data.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(unit as i32)
    })
}

fn to_base36(value: i32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let negative = value < 0;
    let mut magnitude = (value as i64).unsigned_abs();

    if magnitude == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while magnitude > 0 {
        out.push(DIGITS[(magnitude % 36) as usize]);
        magnitude /= 36;
    }
    if negative {
        out.push(b'-');
    }
    out.reverse();

    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traits() -> ClientTraits {
        ClientTraits {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64)".into(),
            language: "en-US".into(),
            timezone_offset_minutes: 300,
            screen_width: 1920,
            screen_height: 1080,
            color_depth: 24,
        }
    }

    #[test]
    fn test_hash_values() {
        assert_eq!(hash(""), 0);
        assert_eq!(hash("a"), 97);
        assert_eq!(hash("ab"), 97 * 31 + 98);
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(97), "2p");
        assert_eq!(to_base36(-36), "-10");
        assert_eq!(to_base36(i32::MIN), "-zik0zk");
    }

    #[test]
    fn test_stable_and_sensitive() {
        let a = traits();
        let mut b = traits();

        assert_eq!(a.fingerprint(), traits().fingerprint());

        b.timezone_offset_minutes = -60;
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_charset() {
        let fingerprint = traits().fingerprint();

        assert!(!fingerprint.is_empty());
        assert!(
            fingerprint
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase() || c == '-')
        );
    }
}
