use chain::{Direction, LineArrangement, Task};

/// How each arrangement reads in the task text.
pub fn arrangement_phrase(arrangement: LineArrangement) -> &'static str {
    match arrangement {
        LineArrangement::Horizontal => "arranged horizontally in a row",
        LineArrangement::Vertical => "arranged vertically in a column",
        LineArrangement::DiagonalDown => "arranged diagonally from top-left to bottom-right",
        LineArrangement::DiagonalUp => "arranged diagonally from bottom-left to top-right",
    }
}

fn direction_text(direction: Option<Direction>) -> String {
    direction.map(|d| d.to_string()).unwrap_or_default()
}

/// The task text. It fixes everything the ground-truth video shows: gear
/// count and layout, the first gear's direction, the marked teeth and
/// when the rotation stops.
pub fn task_prompt(task: &Task) -> String {
    let n = task.num_gears();
    format!(
        "A chain of {n} connected gears is {line}.
Each gear has one GREEN colored tooth.

G1 (the first gear) rotates {first} (shown by blue arrow).
Adjacent gears always rotate in OPPOSITE directions.

Animation requirements:
1. All gears rotate according to the direction rules
2. The rotation STOPS when the green teeth of the last two gears (G{prev} and G{n}) meet exactly
3. At the end, G{n}'s rotation direction is revealed with a blue arrow
4. G{n} is highlighted when the answer is shown

What direction does G{n} rotate? Show the gears rotating until the green teeth \
         alignment stopping condition is met.",
        n = n,
        line = arrangement_phrase(task.arrangement()),
        first = direction_text(task.first_direction()),
        prev = n.saturating_sub(1),
    )
}

/// Short prompt used when listing the task family.
pub const SUMMARY_PROMPT: &str =
    "Gear chain with green teeth. Gears rotate until green teeth of last two gears meet exactly.";

/// Overlay text drawn in the top-left corner of a frame.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Captions {
    pub initial: [String; 2],
    pub final_state: [String; 2],
}

pub fn captions(task: &Task) -> Captions {
    Captions {
        initial: [
            format!("G1 rotates {}", direction_text(task.first_direction())),
            "Green tooth on each gear".to_owned(),
        ],
        final_state: [
            format!(
                "G{} rotates {}",
                task.num_gears(),
                direction_text(task.last_direction())
            ),
            "Green teeth meet!".to_owned(),
        ],
    }
}
