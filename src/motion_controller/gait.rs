use crate::error::{LocomotionError, LocomotionResult};
use crate::leg::LegFlags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::*;

/// Fraction of the cycle spent in swing before a leg touches down
pub const DEFAULT_DUTY_THRESHOLD: f32 = 0.5;

/// Largest f32 below 1
const LAST_PHASE: f32 = 1.0 - f32::EPSILON / 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GaitType {
    Tripod,
    Wave,
    Ripple,
    Trot,
    Pace,
    Bound,
    Walk,
}

impl GaitType {
    pub const HEXAPOD: [GaitType; 3] = [GaitType::Tripod, GaitType::Wave, GaitType::Ripple];
    pub const QUADRUPED: [GaitType; 4] = [
        GaitType::Trot,
        GaitType::Pace,
        GaitType::Bound,
        GaitType::Walk,
    ];
}

impl fmt::Display for GaitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GaitType::Tripod => "tripod",
            GaitType::Wave => "wave",
            GaitType::Ripple => "ripple",
            GaitType::Trot => "trot",
            GaitType::Pace => "pace",
            GaitType::Bound => "bound",
            GaitType::Walk => "walk",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for GaitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tripod" => Ok(GaitType::Tripod),
            "wave" => Ok(GaitType::Wave),
            "ripple" => Ok(GaitType::Ripple),
            "trot" => Ok(GaitType::Trot),
            "pace" => Ok(GaitType::Pace),
            "bound" => Ok(GaitType::Bound),
            "walk" => Ok(GaitType::Walk),
            other => Err(format!("Unknown gait {}", other)),
        }
    }
}

/// How groups of a pattern take turns swinging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaitTiming {
    /// Every group follows the cycle phase shifted by its own offset
    PhaseOffset,
    /// Groups swing one at a time in table order, one slot per group
    Sequential,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GaitGroup {
    pub legs: LegFlags,
    pub phase_offset: f32,
}

impl GaitGroup {
    pub fn new(legs: LegFlags, phase_offset: f32) -> Self {
        Self { legs, phase_offset }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GaitPattern {
    gait: GaitType,
    groups: Vec<GaitGroup>,
    timing: GaitTiming,
    duty_threshold: f32,
}

impl GaitPattern {
    pub fn new(gait: GaitType, groups: Vec<GaitGroup>, timing: GaitTiming) -> Self {
        Self {
            gait,
            groups,
            timing,
            duty_threshold: DEFAULT_DUTY_THRESHOLD,
        }
    }

    /// Evenly spaced groups, offsets `k / n` in the given order
    fn evenly_spaced(gait: GaitType, legs: &[LegFlags], timing: GaitTiming) -> Self {
        let count = legs.len() as f32;
        let groups = legs
            .iter()
            .enumerate()
            .map(|(index, legs)| GaitGroup::new(*legs, index as f32 / count))
            .collect();
        Self::new(gait, groups, timing)
    }

    pub fn with_duty_threshold(mut self, duty_threshold: f32) -> Self {
        self.duty_threshold = duty_threshold;
        self
    }

    pub fn gait(&self) -> GaitType {
        self.gait
    }

    pub fn groups(&self) -> &[GaitGroup] {
        &self.groups
    }

    pub fn timing(&self) -> GaitTiming {
        self.timing
    }

    pub fn duty_threshold(&self) -> f32 {
        self.duty_threshold
    }

    /// Share of the cycle each leg spends planted
    pub fn stance_fraction(&self) -> f32 {
        match self.timing {
            GaitTiming::PhaseOffset => 1.0 - self.duty_threshold,
            GaitTiming::Sequential => 1.0 - 1.0 / self.groups.len().max(1) as f32,
        }
    }

    pub fn group_of(&self, leg: usize) -> Option<usize> {
        self.groups
            .iter()
            .position(|group| group.legs.contains_leg(leg))
    }

    /// Check that the groups partition legs `0..leg_count` exactly once
    pub fn validate(&self, leg_count: usize) -> LocomotionResult<()> {
        let invalid = |reason: String| LocomotionError::InvalidGaitPattern {
            gait: self.gait,
            reason,
        };
        if self.groups.is_empty() {
            return Err(invalid("pattern has no groups".to_owned()));
        }
        if !(self.duty_threshold > 0.0 && self.duty_threshold < 1.0) {
            return Err(invalid(format!(
                "duty threshold {} outside (0, 1)",
                self.duty_threshold
            )));
        }
        let mut covered = LegFlags::empty();
        for (index, group) in self.groups.iter().enumerate() {
            if group.legs.is_empty() {
                return Err(invalid(format!("group {} is empty", index)));
            }
            if !(group.phase_offset >= 0.0 && group.phase_offset < 1.0) {
                return Err(invalid(format!(
                    "group {} phase offset {} outside [0, 1)",
                    index, group.phase_offset
                )));
            }
            if covered.intersects(group.legs) {
                return Err(invalid(format!(
                    "group {} repeats legs {:?}",
                    index,
                    (covered & group.legs).leg_indices().collect::<Vec<_>>()
                )));
            }
            covered |= group.legs;
        }
        let expected = LegFlags::first_legs(leg_count);
        if covered != expected {
            let missing: Vec<_> = expected.difference(covered).leg_indices().collect();
            let extra: Vec<_> = covered.difference(expected).leg_indices().collect();
            return Err(invalid(format!(
                "legs missing {:?}, unknown legs {:?}",
                missing, extra
            )));
        }
        Ok(())
    }
}

/// Every gait pattern available to a body with a fixed leg count
#[derive(Debug, Clone, PartialEq)]
pub struct GaitPatternTable {
    leg_count: usize,
    patterns: BTreeMap<GaitType, GaitPattern>,
}

impl GaitPatternTable {
    pub fn empty(leg_count: usize) -> Self {
        Self {
            leg_count,
            patterns: BTreeMap::new(),
        }
    }

    /// Legs ordered left front, left middle, left rear, right front, right middle, right rear
    pub fn hexapod() -> Self {
        let mut table = Self::empty(6);
        table.insert(GaitPattern::evenly_spaced(
            GaitType::Tripod,
            &[LegFlags::LRL_TRIPOD, LegFlags::RLR_TRIPOD],
            GaitTiming::PhaseOffset,
        ));
        table.insert(GaitPattern::evenly_spaced(
            GaitType::Wave,
            &[
                LegFlags::LEFT_REAR,
                LegFlags::LEFT_MIDDLE,
                LegFlags::LEFT_FRONT,
                LegFlags::RIGHT_REAR,
                LegFlags::RIGHT_MIDDLE,
                LegFlags::RIGHT_FRONT,
            ],
            GaitTiming::PhaseOffset,
        ));
        table.insert(GaitPattern::evenly_spaced(
            GaitType::Ripple,
            &[
                LegFlags::LEFT_REAR | LegFlags::RIGHT_FRONT,
                LegFlags::LEFT_MIDDLE | LegFlags::RIGHT_REAR,
                LegFlags::LEFT_FRONT | LegFlags::RIGHT_MIDDLE,
            ],
            GaitTiming::PhaseOffset,
        ));
        table
    }

    /// Legs ordered left front, left rear, right front, right rear
    pub fn quadruped() -> Self {
        const LEFT_FRONT: usize = 0;
        const LEFT_REAR: usize = 1;
        const RIGHT_FRONT: usize = 2;
        const RIGHT_REAR: usize = 3;
        let pair = |a: usize, b: usize| LegFlags::from_legs(&[a, b]);

        let mut table = Self::empty(4);
        table.insert(GaitPattern::evenly_spaced(
            GaitType::Trot,
            &[pair(LEFT_FRONT, RIGHT_REAR), pair(RIGHT_FRONT, LEFT_REAR)],
            GaitTiming::PhaseOffset,
        ));
        table.insert(GaitPattern::evenly_spaced(
            GaitType::Pace,
            &[pair(LEFT_FRONT, LEFT_REAR), pair(RIGHT_FRONT, RIGHT_REAR)],
            GaitTiming::PhaseOffset,
        ));
        table.insert(GaitPattern::evenly_spaced(
            GaitType::Bound,
            &[pair(LEFT_FRONT, RIGHT_FRONT), pair(LEFT_REAR, RIGHT_REAR)],
            GaitTiming::PhaseOffset,
        ));
        table.insert(GaitPattern::evenly_spaced(
            GaitType::Walk,
            &[
                LegFlags::leg(LEFT_REAR),
                LegFlags::leg(LEFT_FRONT),
                LegFlags::leg(RIGHT_REAR),
                LegFlags::leg(RIGHT_FRONT),
            ],
            GaitTiming::Sequential,
        ));
        table
    }

    pub fn for_leg_count(leg_count: usize) -> LocomotionResult<Self> {
        match leg_count {
            6 => Ok(Self::hexapod()),
            4 => Ok(Self::quadruped()),
            other => Err(LocomotionError::UnsupportedLegCount(other)),
        }
    }

    /// Use one duty threshold for every pattern in the table
    pub fn with_duty_threshold(mut self, duty_threshold: f32) -> Self {
        for pattern in self.patterns.values_mut() {
            pattern.duty_threshold = duty_threshold;
        }
        self
    }

    /// Add or replace a pattern
    pub fn insert(&mut self, pattern: GaitPattern) {
        self.patterns.insert(pattern.gait, pattern);
    }

    pub fn get(&self, gait: GaitType) -> Option<&GaitPattern> {
        self.patterns.get(&gait)
    }

    pub fn leg_count(&self) -> usize {
        self.leg_count
    }

    pub fn gaits(&self) -> impl Iterator<Item = GaitType> + '_ {
        self.patterns.keys().copied()
    }

    pub fn validate(&self) -> LocomotionResult<()> {
        for pattern in self.patterns.values() {
            pattern.validate(self.leg_count)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegPhase {
    Stance,
    /// Airborne, `progress` runs from lift-off at 0 to touch-down at 1
    Swing { progress: f32 },
}

impl LegPhase {
    pub fn is_stance(&self) -> bool {
        matches!(self, LegPhase::Stance)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleState {
    timer: f32,
    cycle_duration: f32,
}

impl CycleState {
    pub fn new(cycle_duration: f32) -> Self {
        Self {
            timer: 0.0,
            cycle_duration,
        }
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn cycle_duration(&self) -> f32 {
        self.cycle_duration
    }

    /// Position in the cycle, in [0, 1)
    pub fn fraction(&self) -> f32 {
        self.fraction_f64() as f32
    }

    /// Both operands are exact in f64, so the quotient stays below 1
    fn fraction_f64(&self) -> f64 {
        self.timer as f64 / self.cycle_duration as f64
    }

    fn advance(&mut self, dt: f32) {
        if !(dt > 0.0 && dt.is_finite()) {
            return;
        }
        let timer = (self.timer + dt).rem_euclid(self.cycle_duration);
        self.timer = if timer < self.cycle_duration { timer } else { 0.0 };
    }

    fn reset(&mut self) {
        self.timer = 0.0;
    }
}

/// Decides which legs swing and which hold the ground
pub struct GaitScheduler {
    table: GaitPatternTable,
    current: GaitType,
    leg_groups: Vec<usize>,
    cycle: CycleState,
}

impl GaitScheduler {
    pub fn new(
        table: GaitPatternTable,
        initial: GaitType,
        cycle_duration: f32,
    ) -> LocomotionResult<Self> {
        if !(cycle_duration > 0.0 && cycle_duration.is_finite()) {
            return Err(LocomotionError::InvalidSetting {
                name: "cycle_duration",
                value: cycle_duration,
            });
        }
        table.validate()?;
        let leg_groups = Self::leg_group_table(&table, initial)?;
        Ok(Self {
            table,
            current: initial,
            leg_groups,
            cycle: CycleState::new(cycle_duration),
        })
    }

    fn leg_group_table(table: &GaitPatternTable, gait: GaitType) -> LocomotionResult<Vec<usize>> {
        let pattern = table
            .get(gait)
            .ok_or(LocomotionError::UnsupportedGait(gait))?;
        (0..table.leg_count())
            .map(|leg| {
                pattern
                    .group_of(leg)
                    .ok_or_else(|| LocomotionError::InvalidGaitPattern {
                        gait,
                        reason: format!("leg {} has no group", leg),
                    })
            })
            .collect()
    }

    pub fn current_gait(&self) -> GaitType {
        self.current
    }

    pub fn pattern(&self) -> &GaitPattern {
        // current gait is only ever set to a gait present in the table
        &self.table.patterns[&self.current]
    }

    pub fn table(&self) -> &GaitPatternTable {
        &self.table
    }

    pub fn cycle(&self) -> &CycleState {
        &self.cycle
    }

    pub fn leg_groups(&self) -> &[usize] {
        &self.leg_groups
    }

    pub fn group_of(&self, leg: usize) -> usize {
        self.leg_groups[leg]
    }

    /// Switch pattern and restart the cycle.
    ///
    /// Returns false when already walking with `gait`.
    pub fn change_gait(&mut self, gait: GaitType) -> LocomotionResult<bool> {
        if gait == self.current {
            return Ok(false);
        }
        self.leg_groups = Self::leg_group_table(&self.table, gait)?;
        info!("Changing gait from {} to {}", self.current, gait);
        self.current = gait;
        self.cycle.reset();
        Ok(true)
    }

    pub fn advance(&mut self, dt: f32) {
        self.cycle.advance(dt);
    }

    /// `(timer / cycle_duration + offset) mod 1`
    pub fn group_phase(&self, group: usize) -> f32 {
        (self.group_phase_f64(group) as f32).min(LAST_PHASE)
    }

    /// Phases of all groups come from one f64 cycle fraction and wrap by a
    /// single subtraction, so groups half a cycle apart never both fall
    /// below the threshold.
    fn group_phase_f64(&self, group: usize) -> f64 {
        let offset = self.pattern().groups[group].phase_offset as f64;
        let phase = self.cycle.fraction_f64() + offset;
        if phase >= 1.0 {
            phase - 1.0
        } else {
            phase
        }
    }

    /// Group currently swinging in a sequential pattern
    pub fn active_group(&self) -> Option<usize> {
        let pattern = self.pattern();
        match pattern.timing {
            GaitTiming::Sequential => {
                let slots = pattern.groups.len();
                let slot = (self.cycle.fraction() * slots as f32).floor() as usize;
                Some(slot.min(slots - 1))
            }
            GaitTiming::PhaseOffset => None,
        }
    }

    pub fn group_state(&self, group: usize) -> LegPhase {
        let pattern = self.pattern();
        match pattern.timing {
            GaitTiming::PhaseOffset => {
                let phase = self.group_phase_f64(group);
                let threshold = pattern.duty_threshold as f64;
                if phase >= threshold {
                    LegPhase::Stance
                } else {
                    LegPhase::Swing {
                        progress: (phase / threshold) as f32,
                    }
                }
            }
            GaitTiming::Sequential => {
                let slots = pattern.groups.len() as f32;
                let position = self.cycle.fraction() * slots;
                if Some(group) == self.active_group() {
                    let progress = (position - group as f32).clamp(0.0, 1.0);
                    LegPhase::Swing { progress }
                } else {
                    LegPhase::Stance
                }
            }
        }
    }

    pub fn leg_phase(&self, leg: usize) -> LegPhase {
        self.group_state(self.group_of(leg))
    }

    pub fn stance_legs(&self) -> LegFlags {
        (0..self.leg_groups.len())
            .filter(|leg| self.leg_phase(*leg).is_stance())
            .fold(LegFlags::empty(), |flags, leg| flags | LegFlags::leg(leg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bundled_tables_partition_legs() {
        let hexapod = GaitPatternTable::hexapod();
        hexapod.validate().unwrap();
        assert_eq!(hexapod.gaits().collect::<Vec<_>>(), GaitType::HEXAPOD.to_vec());
        let quadruped = GaitPatternTable::quadruped();
        quadruped.validate().unwrap();
        assert_eq!(
            quadruped.gaits().collect::<Vec<_>>(),
            GaitType::QUADRUPED.to_vec()
        );
        assert!(GaitPatternTable::for_leg_count(5).is_err());
    }

    #[test]
    fn rejects_repeated_leg() {
        let pattern = GaitPattern::new(
            GaitType::Tripod,
            vec![
                GaitGroup::new(LegFlags::LRL_TRIPOD, 0.0),
                GaitGroup::new(LegFlags::RLR_TRIPOD | LegFlags::LEFT_FRONT, 0.5),
            ],
            GaitTiming::PhaseOffset,
        );
        assert!(matches!(
            pattern.validate(6),
            Err(LocomotionError::InvalidGaitPattern { .. })
        ));
    }

    #[test]
    fn rejects_missing_leg_and_bad_offset() {
        let missing = GaitPattern::new(
            GaitType::Tripod,
            vec![GaitGroup::new(LegFlags::LRL_TRIPOD, 0.0)],
            GaitTiming::PhaseOffset,
        );
        assert!(missing.validate(6).is_err());
        let bad_offset = GaitPattern::new(
            GaitType::Tripod,
            vec![
                GaitGroup::new(LegFlags::LRL_TRIPOD, 0.0),
                GaitGroup::new(LegFlags::RLR_TRIPOD, 1.0),
            ],
            GaitTiming::PhaseOffset,
        );
        assert!(bad_offset.validate(6).is_err());
        let bad_duty = GaitPatternTable::hexapod().with_duty_threshold(1.0);
        assert!(bad_duty.validate().is_err());
    }

    #[test]
    fn tripod_phases_swap_after_half_cycle() {
        let mut scheduler =
            GaitScheduler::new(GaitPatternTable::hexapod(), GaitType::Tripod, 0.8).unwrap();
        assert_relative_eq!(scheduler.group_phase(0), 0.0);
        assert_relative_eq!(scheduler.group_phase(1), 0.5);
        assert!(!scheduler.group_state(0).is_stance());
        assert!(scheduler.group_state(1).is_stance());

        scheduler.advance(0.4);
        assert_relative_eq!(scheduler.group_phase(0), 0.5);
        assert_relative_eq!(scheduler.group_phase(1), 0.0);
        assert!(scheduler.group_state(0).is_stance());
        assert!(!scheduler.group_state(1).is_stance());
    }

    #[test]
    fn tripod_always_has_three_legs_in_stance() {
        let mut scheduler =
            GaitScheduler::new(GaitPatternTable::hexapod(), GaitType::Tripod, 0.8).unwrap();
        for tick in 0..2000 {
            let dt = 0.001 + (tick % 17) as f32 * 0.0037;
            scheduler.advance(dt);
            assert_tripod_split(&scheduler);
        }
    }

    fn assert_tripod_split(scheduler: &GaitScheduler) {
        let stance = scheduler.stance_legs();
        assert_eq!(
            stance.leg_count(),
            3,
            "timer {:e} fraction {:e}",
            scheduler.cycle().timer(),
            scheduler.cycle().fraction()
        );
        assert!(stance == LegFlags::LRL_TRIPOD || stance == LegFlags::RLR_TRIPOD);
    }

    #[test]
    fn tripod_split_holds_for_every_timer_near_group_boundaries() {
        let mut scheduler =
            GaitScheduler::new(GaitPatternTable::hexapod(), GaitType::Tripod, 0.8).unwrap();
        for boundary in [0.4_f32, 0.8] {
            let bits = boundary.to_bits();
            for step in 0..4000 {
                let timer = f32::from_bits(bits - 2000 + step);
                scheduler.cycle.reset();
                scheduler.advance(timer);
                assert_tripod_split(&scheduler);
            }
        }
    }

    #[test]
    fn phases_stay_in_unit_interval() {
        let mut scheduler =
            GaitScheduler::new(GaitPatternTable::hexapod(), GaitType::Wave, 1.3).unwrap();
        for _ in 0..500 {
            scheduler.advance(0.07);
            for group in 0..scheduler.pattern().groups().len() {
                let phase = scheduler.group_phase(group);
                assert!((0.0..1.0).contains(&phase));
            }
            assert!(scheduler.cycle().timer() < scheduler.cycle().cycle_duration());
        }
    }

    #[test]
    fn change_to_same_gait_is_noop() {
        let mut scheduler =
            GaitScheduler::new(GaitPatternTable::hexapod(), GaitType::Tripod, 0.8).unwrap();
        scheduler.advance(0.3);
        let groups = scheduler.leg_groups().to_vec();
        let timer = scheduler.cycle().timer();
        assert!(!scheduler.change_gait(GaitType::Tripod).unwrap());
        assert_eq!(scheduler.leg_groups(), groups.as_slice());
        assert_eq!(scheduler.cycle().timer(), timer);
    }

    #[test]
    fn change_gait_resets_timer_and_groups() {
        let mut scheduler =
            GaitScheduler::new(GaitPatternTable::hexapod(), GaitType::Tripod, 0.8).unwrap();
        scheduler.advance(0.3);
        assert!(scheduler.change_gait(GaitType::Wave).unwrap());
        assert_eq!(scheduler.cycle().timer(), 0.0);
        assert_eq!(scheduler.current_gait(), GaitType::Wave);
        // wave puts every leg in its own group
        let mut groups = scheduler.leg_groups().to_vec();
        groups.sort_unstable();
        assert_eq!(groups, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn change_to_gait_of_other_body_fails() {
        let mut scheduler =
            GaitScheduler::new(GaitPatternTable::quadruped(), GaitType::Trot, 0.8).unwrap();
        assert!(matches!(
            scheduler.change_gait(GaitType::Tripod),
            Err(LocomotionError::UnsupportedGait(GaitType::Tripod))
        ));
        assert_eq!(scheduler.current_gait(), GaitType::Trot);
    }

    #[test]
    fn rejects_invalid_cycle_duration() {
        assert!(GaitScheduler::new(GaitPatternTable::hexapod(), GaitType::Tripod, 0.0).is_err());
        assert!(
            GaitScheduler::new(GaitPatternTable::hexapod(), GaitType::Tripod, f32::NAN).is_err()
        );
    }

    #[test]
    fn walk_swings_one_leg_at_a_time_in_sequence() {
        let mut scheduler =
            GaitScheduler::new(GaitPatternTable::quadruped(), GaitType::Walk, 1.0).unwrap();
        let mut active_sequence = vec![];
        for _ in 0..100 {
            let swinging: Vec<_> = (0..4)
                .filter(|leg| !scheduler.leg_phase(*leg).is_stance())
                .collect();
            assert_eq!(swinging.len(), 1);
            if active_sequence.last() != Some(&swinging[0]) {
                active_sequence.push(swinging[0]);
            }
            scheduler.advance(0.01);
        }
        // left rear, left front, right rear, right front
        assert_eq!(active_sequence, vec![1, 0, 3, 2]);
    }

    #[test]
    fn walk_swing_progress_spans_slot() {
        let mut scheduler =
            GaitScheduler::new(GaitPatternTable::quadruped(), GaitType::Walk, 1.0).unwrap();
        scheduler.advance(0.375);
        assert_eq!(scheduler.active_group(), Some(1));
        match scheduler.group_state(1) {
            LegPhase::Swing { progress } => assert_relative_eq!(progress, 0.5),
            LegPhase::Stance => panic!("active group should swing"),
        }
    }

    #[test]
    fn swing_progress_doubles_phase_at_default_threshold() {
        let mut scheduler =
            GaitScheduler::new(GaitPatternTable::quadruped(), GaitType::Trot, 1.0).unwrap();
        scheduler.advance(0.125);
        match scheduler.group_state(0) {
            LegPhase::Swing { progress } => assert_relative_eq!(progress, 0.25),
            LegPhase::Stance => panic!("group 0 should swing"),
        }
    }

    #[test]
    fn stance_fraction_follows_timing() {
        let hexapod = GaitPatternTable::hexapod();
        assert_relative_eq!(hexapod.get(GaitType::Tripod).unwrap().stance_fraction(), 0.5);
        let quadruped = GaitPatternTable::quadruped();
        assert_relative_eq!(quadruped.get(GaitType::Walk).unwrap().stance_fraction(), 0.75);
        let slow = GaitPatternTable::quadruped().with_duty_threshold(0.25);
        assert_relative_eq!(slow.get(GaitType::Trot).unwrap().stance_fraction(), 0.75);
    }

    #[test]
    fn gait_names_parse() {
        for gait in GaitType::HEXAPOD.iter().chain(GaitType::QUADRUPED.iter()) {
            assert_eq!(gait.to_string().parse::<GaitType>().unwrap(), *gait);
        }
        assert!("gallop".parse::<GaitType>().is_err());
    }
}
