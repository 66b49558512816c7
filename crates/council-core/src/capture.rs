//! Interactive capture of today's pulse.

use crate::interaction::Console;
use crate::paths::date_stem;
use crate::pulse::{or_not_specified, split_list, Pulse};
use chrono::NaiveDate;
use std::io;

/// Ask the pulse questions in order. Goal and emotional state are re-asked
/// until answered; list answers are comma-separated.
pub fn capture<C: Console + ?Sized>(console: &mut C, today: NaiveDate) -> io::Result<Pulse> {
    let date = date_stem(today);
    console.show(&format!("Capturing pulse for: {date}"))?;
    console.show("(Leave optional answers blank. Separate blockers and feedback with commas.)")?;

    let goal = ask_required(console, "Today's primary goal?")?;
    let blockers = console.ask("Current blockers / friction? (comma-separated)")?;
    let feedback = console.ask("Recent user feedback / insights? (comma-separated)")?;
    let energy = console.ask("Energy level? (e.g. Low, Medium, High)")?;
    let emotion = ask_required(console, "Emotional state? (e.g. Focused, Tired, Optimistic)")?;

    Ok(Pulse {
        date,
        goal,
        blockers: split_list(&blockers),
        user_feedback: split_list(&feedback),
        energy_level: or_not_specified(&energy),
        emotional_state: emotion,
    })
}

fn ask_required<C: Console + ?Sized>(console: &mut C, question: &str) -> io::Result<String> {
    loop {
        let answer = console.ask(question)?;
        if !answer.trim().is_empty() {
            return Ok(answer.trim().to_string());
        }
        console.show("This one is required.")?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pulse::NOT_SPECIFIED;
    use crate::testing::ScriptedConsole;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn captures_all_fields() {
        let mut console = ScriptedConsole::new([
            "Ship v1",
            "flaky CI, , slow review",
            "",
            "",
            "Focused",
        ]);
        let pulse = capture(&mut console, today()).unwrap();
        assert_eq!(
            pulse,
            Pulse {
                date: "2024-01-01".into(),
                goal: "Ship v1".into(),
                blockers: vec!["flaky CI".into(), "slow review".into()],
                user_feedback: vec![],
                energy_level: NOT_SPECIFIED.into(),
                emotional_state: "Focused".into(),
            }
        );
    }

    #[test]
    fn required_questions_repeat_until_answered() {
        let mut console = ScriptedConsole::new(["", "  ", "Ship v1", "", "", "High", "", "Tired"]);
        let pulse = capture(&mut console, today()).unwrap();
        assert_eq!(pulse.goal, "Ship v1");
        assert_eq!(pulse.emotional_state, "Tired");
        assert_eq!(pulse.energy_level, "High");
        let goal_asks = console
            .asked
            .iter()
            .filter(|q| q.starts_with("Today's primary goal"))
            .count();
        assert_eq!(goal_asks, 3);
    }

    #[test]
    fn eof_aborts_capture() {
        let mut console = ScriptedConsole::new(["Ship v1"]);
        let err = capture(&mut console, today()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
