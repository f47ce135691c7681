//! Validation helpers for DTOs.

use validator::ValidationError;

/// Rejects strings that are empty or only whitespace.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("value must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Rejects player lists that are empty or contain a blank or repeated name.
pub fn validate_players(players: &[String]) -> Result<(), ValidationError> {
    if players.is_empty() {
        let mut err = ValidationError::new("players_empty");
        err.message = Some("a team needs at least one player".into());
        return Err(err);
    }

    for (idx, player) in players.iter().enumerate() {
        validate_not_blank(player)?;
        if players[..idx].contains(player) {
            let mut err = ValidationError::new("players_duplicate");
            err.message = Some(format!("player `{player}` is listed twice").into());
            return Err(err);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_rejected() {
        assert!(validate_not_blank("Kabaddi").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   ").is_err());
    }

    #[test]
    fn players_must_be_present_and_distinct() {
        assert!(validate_players(&["A".into(), "B".into()]).is_ok());
        assert!(validate_players(&[]).is_err());
        assert!(validate_players(&["A".into(), " ".into()]).is_err());
        assert!(validate_players(&["A".into(), "A".into()]).is_err());
    }
}
