//! Human-readable rendering of registers and step logs.
//!
//! Shared by the CLI, the terminal visualizer and the wasm bindings.

use crate::booth::engine::{Action, StepSnapshot};

/// Zero-padded binary rendering of a `bits`-wide pattern.
pub fn to_binary(pattern: u128, bits: u32) -> String {
    format!("{:0width$b}", pattern, width = bits as usize)
}

/// Long description of an action, as shown in the operation log.
pub fn describe_action(action: Action) -> &'static str {
    match action {
        Action::None => "NONE",
        Action::Add => "ADD (A = A + M)",
        Action::Subtract => "SUB (A = A - M)",
    }
}

/// One log line for a step, using signed register values.
pub fn format_step(snap: &StepSnapshot) -> String {
    format!(
        "Step {:2}: {:15} | A={:>6} Q={:>6} Q-1={}",
        snap.step,
        describe_action(snap.action),
        snap.a_signed,
        snap.q_signed,
        snap.q1
    )
}

/// A table of every step with binary registers.
pub fn format_table(bits: u32, steps: &[StepSnapshot]) -> String {
    let w = bits as usize;
    let mut output = String::new();
    output.push_str(&format!(
        "{:>4}  {:<w$}  {:<w$}  {:>3}  {}\n",
        "step", "A", "Q", "Q-1", "action",
        w = w
    ));
    output.push_str(&format!("{}\n", "-".repeat(2 * w + 28)));

    for snap in steps {
        output.push_str(&format!(
            "{:>4}  {}  {}  {:>3}  {}\n",
            snap.step,
            to_binary(snap.a as u128, bits),
            to_binary(snap.q as u128, bits),
            snap.q1,
            describe_action(snap.action)
        ));
    }

    output
}
