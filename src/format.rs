//! Display helpers for task cards.

use chrono::NaiveDate;

/// Human label for a due date relative to `today`.
///
/// Returns an empty string when there is no due date.
pub fn relative_due(due: Option<NaiveDate>, today: NaiveDate) -> String {
    let Some(due) = due else {
        return String::new();
    };
    let days = (due - today).num_days();
    match days {
        d if d < 0 => format!("Overdue by {}d", -d),
        0 => "Due today".to_string(),
        1 => "Due tomorrow".to_string(),
        d => format!("Due in {}d", d),
    }
}

/// Up to two uppercase initials for an avatar placeholder.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_relative_due() {
        let today = day(18);
        assert_eq!(relative_due(None, today), "");
        assert_eq!(relative_due(Some(day(15)), today), "Overdue by 3d");
        assert_eq!(relative_due(Some(day(18)), today), "Due today");
        assert_eq!(relative_due(Some(day(19)), today), "Due tomorrow");
        assert_eq!(relative_due(Some(day(25)), today), "Due in 7d");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("Maya Chen"), "MC");
        assert_eq!(initials("sam"), "S");
        assert_eq!(initials("Tara de la Cruz"), "TD");
        assert_eq!(initials(""), "");
    }
}
