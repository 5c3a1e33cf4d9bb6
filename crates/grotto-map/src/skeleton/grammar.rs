use super::{random_axiom, Mark, RuleTable, Skeleton, Symbol, Turtle};
use crate::glam::Vec3;

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct GrammarConfig {
    /// Length of a forward move before any step symbols apply.
    pub base_step: f32,
    /// Turn angle in degrees before any angle symbols apply.
    pub base_angle: f32,
    /// Number of expansion steps when rules are generated.
    pub generations: usize,
    /// Predetermined rule rows, concatenated. The row count overrides `generations`.
    pub rules: Option<String>,
    /// Predetermined starting word.
    pub axiom: Option<String>,
    /// Length of a generated axiom, not counting the closing forward move.
    pub axiom_length: usize,
    pub seed: u64,
    pub start_position: Vec3,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            base_step: 10.0,
            base_angle: 30.0,
            generations: 3,
            rules: None,
            axiom: None,
            axiom_length: 5,
            seed: 0,
            start_position: Vec3::ZERO,
        }
    }
}

/// A rule table and axiom, expanded into the final word.
#[derive(Clone, Debug)]
pub struct SkeletonGrammar {
    rules: RuleTable,
    axiom: String,
    word: String,
}

impl SkeletonGrammar {
    /// Resolves the rules and axiom from `config` and expands them.
    ///
    /// A malformed predetermined rule string is logged and replaced by pseudorandom rules for `config.generations`.
    pub fn new(config: &GrammarConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);

        let rules = match config.rules.as_deref().map(RuleTable::parse) {
            Some(Ok(table)) => table,
            Some(Err(e)) => {
                log::error!("Falling back to generated rules: {}", e);
                RuleTable::random(config.generations, &mut rng)
            }
            None => RuleTable::random(config.generations, &mut rng),
        };
        log::info!("Rules: {}", rules);

        let axiom = match &config.axiom {
            Some(axiom) => axiom.clone(),
            None => {
                let axiom = random_axiom(config.axiom_length, &mut rng);
                log::info!("Axiom: {}", axiom);
                axiom
            }
        };

        Self::from_parts(rules, axiom)
    }

    pub fn from_parts(rules: RuleTable, axiom: String) -> Self {
        let word = rules.expand(&axiom);
        Self { rules, axiom, word }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn axiom(&self) -> &str {
        &self.axiom
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    /// The turtle actions of the final word, in order. Characters outside of the alphabet are skipped.
    pub fn actions(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.word.chars().filter_map(Symbol::from_char)
    }

    /// Walks the word with a turtle starting at `start`. Branch 0 begins at `start`.
    pub fn interpret(&self, start: Vec3, base_step: f32, base_angle_deg: f32) -> Skeleton {
        let mut branches = vec![vec![start]];
        let mut turtle = Turtle::new(start, base_step, base_angle_deg);
        for symbol in self.actions() {
            let (next, mark) = turtle.apply(symbol);
            turtle = next;
            match mark {
                Mark::None => {}
                Mark::Record(p) => {
                    if let Some(branch) = branches.last_mut() {
                        branch.push(p);
                    }
                }
                Mark::Branch(p) => branches.push(vec![p]),
            }
        }
        Skeleton::grown_from(start, branches)
    }

    pub fn generate(config: &GrammarConfig) -> Skeleton {
        Self::new(config).interpret(config.start_position, config.base_step, config.base_angle)
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod test {
    use super::*;
    use crate::skeleton::RULE_LENGTH;

    use approx::assert_relative_eq;

    #[test]
    fn same_seed_same_skeleton() {
        let config = GrammarConfig {
            seed: 1234,
            generations: 3,
            ..Default::default()
        };
        let a = SkeletonGrammar::new(&config);
        let b = SkeletonGrammar::new(&config);

        assert_eq!(a.rules(), b.rules());
        assert_eq!(a.axiom(), b.axiom());
        assert_eq!(a.word(), b.word());
        assert!(a.actions().eq(b.actions()));
        assert_eq!(SkeletonGrammar::generate(&config), SkeletonGrammar::generate(&config));
    }

    #[test]
    fn predetermined_rules_override_generations() {
        let config = GrammarConfig {
            rules: Some("F+FFFFFF-FFFFF".into()),
            axiom: Some("F".into()),
            generations: 9,
            ..Default::default()
        };
        let grammar = SkeletonGrammar::new(&config);
        assert_eq!(grammar.rules().generations(), 2);
        assert_eq!(grammar.axiom(), "F");
    }

    #[test]
    fn malformed_rules_fall_back_to_generated_rows() {
        let config = GrammarConfig {
            rules: Some("F+F-F+FFSFLFD".into()),
            generations: 4,
            ..Default::default()
        };
        let grammar = SkeletonGrammar::new(&config);

        assert_eq!(grammar.rules().generations(), 4);
        assert_eq!(grammar.rules().to_string().chars().count(), 4 * RULE_LENGTH);
        for row in grammar.rules().rows() {
            assert_eq!(row[0], 'F');
            assert_eq!(row[RULE_LENGTH - 1], 'F');
        }
    }

    #[test]
    fn straight_word_makes_one_branch() {
        let grammar = SkeletonGrammar::from_parts(RuleTable::parse("").unwrap(), "FFF".into());
        let skeleton = grammar.interpret(Vec3::ZERO, 2.0, 45.0);

        assert_eq!(skeleton.branches().len(), 1);
        assert_eq!(
            skeleton.branches()[0],
            vec![
                Vec3::ZERO,
                Vec3::new(0.0, 0.0, 2.0),
                Vec3::new(0.0, 0.0, 4.0),
                Vec3::new(0.0, 0.0, 6.0)
            ]
        );
        assert_relative_eq!(skeleton.extremes().back.z, 6.0);
        assert_relative_eq!(skeleton.extremes().front.z, 0.0);
    }

    #[test]
    fn loads_start_branches_at_the_saved_position() {
        let grammar = SkeletonGrammar::from_parts(RuleTable::parse("").unwrap(), "FSFLUFLF".into());
        let skeleton = grammar.interpret(Vec3::ZERO, 1.0, 90.0);

        let branches = skeleton.branches();
        assert_eq!(branches.len(), 3);
        let saved = Vec3::new(0.0, 0.0, 1.0);
        assert_eq!(branches[0], vec![Vec3::ZERO, saved, Vec3::new(0.0, 0.0, 2.0)]);
        assert_eq!(branches[1][0], saved);
        assert_eq!(branches[1].len(), 2);
        assert_eq!(branches[2][0], saved);
        assert_eq!(branches[2].len(), 2);
        // Orientation survives the load, so the third branch continues pitched.
        assert_relative_eq!(branches[2][1].distance(branches[1][1]), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn unknown_characters_are_ignored() {
        let plain = SkeletonGrammar::from_parts(RuleTable::parse("").unwrap(), "F+F".into());
        let noisy = SkeletonGrammar::from_parts(RuleTable::parse("").unwrap(), "xF?+ Fz".into());
        assert!(plain.actions().eq(noisy.actions()));
    }
}
