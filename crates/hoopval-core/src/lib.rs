// Library root: player valuation and contract evaluation engine.
//
// Raw rows -> normalize -> merge -> PlayerRecord -> {tier, valuation}
// -> evaluation. The projection module works on a record's salary schedule
// independently.

pub mod config;
pub mod directory;
pub mod evaluation;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod projection;
pub mod tier;
pub mod valuation;

pub use config::{Config, ModelConfig};
pub use directory::PlayerDirectory;
pub use evaluation::{evaluate_contract, ContractEvaluation, Tone, Verdict};
pub use merge::{merge_canonical, merge_players};
pub use model::{PlayerRecord, SalarySchedule, Season, SALARY_WINDOW};
pub use projection::{project, ProjectionRow, ProjectionTable};
pub use tier::{EvaluationPolicy, Tier, TierTable};
pub use valuation::{compare, value_player, Assumptions, Comparison, ValuationResult};
