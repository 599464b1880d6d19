//! Booth multiplication engine.
//!
//! Drives the register group through one Booth iteration per [`BoothEngine::step`]
//! and records a snapshot of every completed iteration.

use crate::bits::from_twos_complement;
use crate::booth::registers::{BitWidth, BoothError, Registers};
use serde::{Serialize, Deserialize};
use std::fmt;
use tracing::{debug, trace, warn};

/// Arithmetic performed before the shift of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// (Q₀, Q₋₁) = (0, 0) or (1, 1): shift only.
    None,
    /// (Q₀, Q₋₁) = (0, 1): A ← A + M.
    Add,
    /// (Q₀, Q₋₁) = (1, 0): A ← A − M.
    Subtract,
}

impl Action {
    /// Booth recoding of the pair (Q₀, Q₋₁).
    pub fn decide(q0: u8, q1: u8) -> Self {
        match (q0, q1) {
            (1, 0) => Action::Subtract,
            (0, 1) => Action::Add,
            _ => Action::None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::None => "NONE",
            Action::Add => "ADD",
            Action::Subtract => "SUB",
        };
        f.write_str(s)
    }
}

/// Engine execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Fewer than n steps have completed.
    Running,
    /// All n steps have completed.
    Done,
}

/// Register state after one completed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSnapshot {
    /// 1-based iteration index.
    pub step: u32,
    pub action: Action,
    pub a: u64,
    pub q: u64,
    pub q1: u8,
    pub m: u64,
    pub a_signed: i64,
    pub q_signed: i64,
    /// A:Q as an unsigned 2n-bit pattern.
    pub product_unsigned: u128,
    /// A:Q as a signed 2n-bit integer.
    pub product_signed: i128,
}

/// Result of [`BoothEngine::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// One iteration ran; carries the snapshot appended to the log.
    Stepped(StepSnapshot),
    /// The engine was already done; nothing changed.
    Finished,
}

impl StepOutcome {
    /// The snapshot, if a step was taken.
    pub fn snapshot(&self) -> Option<&StepSnapshot> {
        match self {
            StepOutcome::Stepped(snap) => Some(snap),
            StepOutcome::Finished => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, StepOutcome::Finished)
    }
}

/// Final registers and product of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub final_a: u64,
    pub final_q: u64,
    pub final_q1: u8,
    pub product_unsigned: u128,
    pub product_signed: i128,
    /// Every step of the run, in order.
    pub steps: Vec<StepSnapshot>,
}

/// The Booth simulator.
#[derive(Clone, Serialize)]
pub struct BoothEngine {
    /// Signed inputs as supplied, kept so width changes re-encode from source.
    multiplicand: i64,
    multiplier: i64,
    width: BitWidth,
    regs: Registers,
    step_count: u32,
    log: Vec<StepSnapshot>,
}

impl BoothEngine {
    /// Create an engine for `multiplicand × multiplier` at `bits` width.
    ///
    /// Fails with [`BoothError::InvalidConfiguration`] when `bits` is outside
    /// the supported range (at least 4).
    pub fn new(multiplicand: i64, multiplier: i64, bits: u32) -> Result<Self, BoothError> {
        let width = BitWidth::new(bits)?;
        Ok(Self::with_width(multiplicand, multiplier, width))
    }

    /// Create an engine for an already validated width.
    pub fn with_width(multiplicand: i64, multiplier: i64, width: BitWidth) -> Self {
        debug!(multiplicand, multiplier, bits = width.get(), "booth engine configured");

        let engine = Self {
            multiplicand,
            multiplier,
            width,
            regs: Registers::load(multiplicand, multiplier, width),
            step_count: 0,
            log: Vec::with_capacity(width.get() as usize),
        };
        engine.warn_on_unrepresentable_negation();
        engine
    }

    /// Perform one Booth iteration.
    ///
    /// Once all n steps have run this returns [`StepOutcome::Finished`] and
    /// leaves the engine untouched.
    pub fn step(&mut self) -> StepOutcome {
        if self.is_done() {
            return StepOutcome::Finished;
        }

        let (q0, q1) = self.regs.decision_pair();
        let action = Action::decide(q0, q1);
        match action {
            Action::Subtract => self.regs.subtract_multiplicand(self.width),
            Action::Add => self.regs.add_multiplicand(self.width),
            Action::None => {}
        }

        self.regs.shift(self.width);
        self.step_count += 1;

        let snapshot = self.snapshot(action);
        trace!(
            step = snapshot.step,
            action = %action,
            a = snapshot.a,
            q = snapshot.q,
            q1 = snapshot.q1,
            "booth step"
        );
        self.log.push(snapshot.clone());

        if self.is_done() {
            debug!(product = %snapshot.product_signed, "booth multiplication complete");
        }

        StepOutcome::Stepped(snapshot)
    }

    /// Step until done and return the final registers, product and log.
    ///
    /// Picks up from wherever a partially stepped engine left off.
    pub fn run(&mut self) -> RunResult {
        while !self.step().is_finished() {}

        RunResult {
            final_a: self.regs.a,
            final_q: self.regs.q,
            final_q1: self.regs.q1,
            product_unsigned: self.product_unsigned(),
            product_signed: self.product_signed(),
            steps: self.log.clone(),
        }
    }

    /// Restart the simulation, optionally with new inputs or width.
    ///
    /// Omitted values keep their current configuration. M and Q are always
    /// re-encoded from the signed inputs, never from the current registers.
    /// A rejected width leaves the engine unchanged.
    pub fn reset(
        &mut self,
        multiplicand: Option<i64>,
        multiplier: Option<i64>,
        bits: Option<u32>,
    ) -> Result<(), BoothError> {
        let width = match bits {
            Some(bits) => BitWidth::new(bits)?,
            None => self.width,
        };

        if let Some(value) = multiplicand {
            self.multiplicand = value;
        }
        if let Some(value) = multiplier {
            self.multiplier = value;
        }
        self.width = width;
        self.regs = Registers::load(self.multiplicand, self.multiplier, width);
        self.step_count = 0;
        self.log.clear();

        debug!(
            multiplicand = self.multiplicand,
            multiplier = self.multiplier,
            bits = width.get(),
            "booth engine reset"
        );
        self.warn_on_unrepresentable_negation();
        Ok(())
    }

    /// Whether M holds the most negative n-bit value.
    ///
    /// −M is not representable in n bits then, so any SUB step wraps and the
    /// final product is wrong unless Q is zero. The registers still follow
    /// the n-bit rules exactly.
    pub fn multiplicand_negation_overflows(&self) -> bool {
        self.regs.m == 1u64 << (self.width.get() - 1)
    }

    fn warn_on_unrepresentable_negation(&self) {
        if self.multiplicand_negation_overflows() {
            warn!(
                m = self.regs.m,
                bits = self.width.get(),
                "multiplicand is the most negative value; A - M overflows"
            );
        }
    }

    fn snapshot(&self, action: Action) -> StepSnapshot {
        let bits = self.width.get();
        StepSnapshot {
            step: self.step_count,
            action,
            a: self.regs.a,
            q: self.regs.q,
            q1: self.regs.q1,
            m: self.regs.m,
            a_signed: from_twos_complement(self.regs.a, bits),
            q_signed: from_twos_complement(self.regs.q, bits),
            product_unsigned: self.product_unsigned(),
            product_signed: self.product_signed(),
        }
    }

    // ==================== Observers ====================

    /// Accumulator pattern.
    pub fn a(&self) -> u64 {
        self.regs.a
    }

    /// Multiplier register pattern.
    pub fn q(&self) -> u64 {
        self.regs.q
    }

    /// Q₋₁ history bit.
    pub fn q1(&self) -> u8 {
        self.regs.q1
    }

    /// Multiplicand pattern.
    pub fn m(&self) -> u64 {
        self.regs.m
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    /// Register width n.
    pub fn bits(&self) -> u32 {
        self.width.get()
    }

    pub fn width(&self) -> BitWidth {
        self.width
    }

    /// Signed multiplicand as configured.
    pub fn multiplicand(&self) -> i64 {
        self.multiplicand
    }

    /// Signed multiplier as configured.
    pub fn multiplier(&self) -> i64 {
        self.multiplier
    }

    /// Completed steps, oldest first.
    pub fn log(&self) -> &[StepSnapshot] {
        &self.log
    }

    pub fn state(&self) -> EngineState {
        if self.is_done() {
            EngineState::Done
        } else {
            EngineState::Running
        }
    }

    pub fn is_done(&self) -> bool {
        self.step_count >= self.width.get()
    }

    /// Current A:Q as an unsigned 2n-bit pattern.
    pub fn product_unsigned(&self) -> u128 {
        self.regs.product_unsigned(self.width)
    }

    /// Current A:Q as a signed 2n-bit integer.
    pub fn product_signed(&self) -> i128 {
        self.regs.product_signed(self.width)
    }
}

impl fmt::Debug for BoothEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoothEngine")
            .field("width", &self.width)
            .field("step", &self.step_count)
            .field("regs", &self.regs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Signed range of an n-bit register.
    fn signed_range(bits: u32) -> std::ops::RangeInclusive<i64> {
        let half = 1i64 << (bits - 1);
        -half..=half - 1
    }

    /// Multiplicands whose negation fits in n bits.
    fn negatable_range(bits: u32) -> std::ops::RangeInclusive<i64> {
        let half = 1i64 << (bits - 1);
        -half + 1..=half - 1
    }

    #[test]
    fn test_rejects_narrow_width() {
        let err = BoothEngine::new(1, 1, 3).unwrap_err();
        assert!(matches!(err, BoothError::InvalidConfiguration { bits: 3, .. }));
    }

    #[test]
    fn test_initial_state() {
        let engine = BoothEngine::new(3, -4, 4).unwrap();
        assert_eq!(engine.m(), 0b0011);
        assert_eq!(engine.q(), 0b1100);
        assert_eq!(engine.a(), 0);
        assert_eq!(engine.q1(), 0);
        assert_eq!(engine.step_count(), 0);
        assert!(engine.log().is_empty());
        assert_eq!(engine.state(), EngineState::Running);
    }

    #[test]
    fn test_three_times_minus_four() {
        let mut engine = BoothEngine::new(3, -4, 4).unwrap();
        let result = engine.run();

        assert_eq!(result.product_signed, -12);
        assert_eq!(result.product_unsigned, 0b1111_0100);
        assert_eq!(result.steps.len(), 4);
        assert_eq!(engine.state(), EngineState::Done);
    }

    #[test]
    fn test_three_times_minus_four_trace() {
        // Q=1100: pairs (0,0) (0,0) (1,0) (1,1)
        let mut engine = BoothEngine::new(3, -4, 4).unwrap();
        let actions: Vec<Action> = engine.run().steps.iter().map(|s| s.action).collect();
        assert_eq!(actions, vec![Action::None, Action::None, Action::Subtract, Action::None]);

        let third = &engine.log()[2];
        // A = 0000 - 0011 = 1101, shifted -> 1110; Q = 0011 -> 1001
        assert_eq!(third.a, 0b1110);
        assert_eq!(third.q, 0b1001);
        assert_eq!(third.q1, 1);
        assert_eq!(third.a_signed, -2);
    }

    #[test]
    fn test_seven_times_minus_three() {
        let mut engine = BoothEngine::new(7, -3, 8).unwrap();
        let result = engine.run();

        assert_eq!(result.product_signed, -21);
        assert_eq!(result.product_unsigned, 0xFFEB);
        assert_eq!(result.final_a, 0xFF);
        assert_eq!(result.final_q, 0xEB);
        assert_eq!(result.steps.last().unwrap().product_signed, -21);
    }

    #[test]
    fn test_exhaustive_four_bit() {
        for m in negatable_range(4) {
            for q in signed_range(4) {
                let mut engine = BoothEngine::new(m, q, 4).unwrap();
                let result = engine.run();
                assert_eq!(result.product_signed, (m * q) as i128, "{} x {}", m, q);
            }
        }
    }

    #[test]
    fn test_exhaustive_five_bit() {
        for m in negatable_range(5) {
            for q in signed_range(5) {
                let mut engine = BoothEngine::new(m, q, 5).unwrap();
                assert_eq!(engine.run().product_signed, (m * q) as i128, "{} x {}", m, q);
            }
        }
    }

    #[test]
    fn test_most_negative_multiplicand_wraps() {
        // -8 has no 4-bit negation: 0000 - 1000 = 1000.
        let mut engine = BoothEngine::new(-8, 1, 4).unwrap();
        assert!(engine.multiplicand_negation_overflows());
        assert_eq!(engine.run().product_signed, 8);

        // Without a SUB step the product is still exact.
        engine.reset(None, Some(0), None).unwrap();
        assert_eq!(engine.run().product_signed, 0);

        engine.reset(Some(-7), None, None).unwrap();
        assert!(!engine.multiplicand_negation_overflows());
    }

    #[test]
    fn test_multiplier_range_is_complete() {
        for m in negatable_range(4) {
            let mut engine = BoothEngine::new(m, -8, 4).unwrap();
            assert_eq!(engine.run().product_signed, (m * -8) as i128);
        }
    }

    #[test]
    fn test_full_width_extremes() {
        let mut engine = BoothEngine::new(i64::MAX, i64::MIN, 64).unwrap();
        assert_eq!(engine.run().product_signed, (i64::MAX as i128) * (i64::MIN as i128));

        engine.reset(Some(i64::MIN + 1), None, None).unwrap();
        assert_eq!(engine.run().product_signed, ((i64::MIN + 1) as i128) * (i64::MIN as i128));
    }

    #[test]
    fn test_step_count_and_log_length() {
        let mut engine = BoothEngine::new(5, 6, 8).unwrap();
        for k in 1..=8 {
            let outcome = engine.step();
            assert_eq!(outcome.snapshot().map(|s| s.step), Some(k));
            assert_eq!(engine.step_count(), k);
            assert_eq!(engine.log().len(), k as usize);
        }
        assert!(engine.is_done());
    }

    #[test]
    fn test_step_after_done_is_noop() {
        let mut engine = BoothEngine::new(5, 6, 4).unwrap();
        engine.run();
        let regs = *engine.registers();

        assert_eq!(engine.step(), StepOutcome::Finished);
        assert_eq!(engine.step(), StepOutcome::Finished);
        assert_eq!(*engine.registers(), regs);
        assert_eq!(engine.step_count(), 4);
        assert_eq!(engine.log().len(), 4);
    }

    #[test]
    fn test_run_from_partial_state() {
        let mut engine = BoothEngine::new(-5, 3, 6).unwrap();
        engine.step();
        engine.step();
        let result = engine.run();

        assert_eq!(result.steps.len(), 6);
        assert_eq!(result.product_signed, -15);
        // A second run does nothing more.
        assert_eq!(engine.run(), result);
    }

    #[test]
    fn test_reset_without_arguments() {
        let mut engine = BoothEngine::new(7, -3, 8).unwrap();
        let fresh = *engine.registers();
        for _ in 0..5 {
            engine.step();
        }

        engine.reset(None, None, None).unwrap();
        assert_eq!(*engine.registers(), fresh);
        assert_eq!(engine.a(), 0);
        assert_eq!(engine.q1(), 0);
        assert_eq!(engine.step_count(), 0);
        assert!(engine.log().is_empty());

        engine.reset(None, None, None).unwrap();
        assert_eq!(*engine.registers(), fresh);
    }

    #[test]
    fn test_reset_with_new_inputs() {
        let mut engine = BoothEngine::new(7, -3, 8).unwrap();
        engine.run();

        engine.reset(Some(-6), None, None).unwrap();
        assert_eq!(engine.multiplicand(), -6);
        assert_eq!(engine.multiplier(), -3);
        assert_eq!(engine.run().product_signed, 18);
    }

    #[test]
    fn test_reset_width_recomputes_from_inputs() {
        // 100 truncates to 0100 at 4 bits; widening must restore 100.
        let mut engine = BoothEngine::new(100, -3, 8).unwrap();
        engine.reset(None, None, Some(4)).unwrap();
        assert_eq!(engine.m(), 0b0100);

        engine.reset(None, None, Some(16)).unwrap();
        assert_eq!(engine.m(), 100);
        assert_eq!(engine.q(), 0xFFFD);
        assert_eq!(engine.run().product_signed, -300);
    }

    #[test]
    fn test_reset_rejects_width_without_mutation() {
        let mut engine = BoothEngine::new(7, -3, 8).unwrap();
        engine.step();
        let before = engine.clone();

        let err = engine.reset(Some(1), Some(1), Some(2)).unwrap_err();
        assert!(matches!(err, BoothError::InvalidConfiguration { bits: 2, .. }));
        assert_eq!(engine.multiplicand(), 7);
        assert_eq!(engine.step_count(), before.step_count());
        assert_eq!(engine.log(), before.log());
        assert_eq!(engine.registers(), before.registers());
    }

    #[test]
    fn test_m_is_constant_during_run() {
        let mut engine = BoothEngine::new(-7, 5, 8).unwrap();
        let m = engine.m();
        for snap in engine.run().steps {
            assert_eq!(snap.m, m);
        }
    }

    #[test]
    fn test_action_decide() {
        assert_eq!(Action::decide(1, 0), Action::Subtract);
        assert_eq!(Action::decide(0, 1), Action::Add);
        assert_eq!(Action::decide(0, 0), Action::None);
        assert_eq!(Action::decide(1, 1), Action::None);
    }

    #[test]
    fn test_run_result_serializes() {
        let mut engine = BoothEngine::new(3, -4, 4).unwrap();
        let json = serde_json::to_value(engine.run()).unwrap();
        assert_eq!(json["product_signed"], -12);
        assert_eq!(json["steps"].as_array().unwrap().len(), 4);
        assert_eq!(json["steps"][2]["action"], "Subtract");
    }

    proptest! {
        #[test]
        fn prop_booth_matches_native_product(bits in 4u32..=64, m in any::<i64>(), q in any::<i64>()) {
            let shift = 64 - bits;
            // Sign-extend the inputs into the width's signed range.
            let (m, q) = ((m << shift) >> shift, (q << shift) >> shift);
            prop_assume!(m != i64::MIN >> shift);

            let mut engine = BoothEngine::new(m, q, bits).unwrap();
            let result = engine.run();
            prop_assert_eq!(result.product_signed, (m as i128) * (q as i128));
            prop_assert_eq!(result.steps.len(), bits as usize);
        }

        #[test]
        fn prop_registers_stay_in_width(bits in 4u32..=16, m in any::<i64>(), q in any::<i64>()) {
            let limit = crate::bits::mask(bits);
            let mut engine = BoothEngine::new(m, q, bits).unwrap();
            for snap in engine.run().steps {
                prop_assert!(snap.a <= limit);
                prop_assert!(snap.q <= limit);
                prop_assert!(snap.m <= limit);
                prop_assert!(snap.q1 <= 1);
                prop_assert!(snap.product_unsigned >> (2 * bits) == 0);
            }
        }
    }
}
