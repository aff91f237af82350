pub mod allocation;
pub mod config;
pub mod domain;
pub mod errors;
pub mod insights;
pub mod mining;
pub mod pricing;
pub mod scoring;

pub use allocation::{
    allocate, overall_performance, reallocate, track_actuals, AllocationInput, BudgetAllocator,
    OverallPerformance, ProportionalAllocator, RequestedChange, TargetActuals, TargetPerformance,
};
pub use config::{ConfigError, EngineConfig, LoadOptions, LogFormat};
pub use domain::allocation::{
    AdjustmentFactor, AdjustmentKind, AllocationPlan, AllocationTarget, BasisItem,
    CalculationBasis, ExpectedOutcomes, FactorCondition, ProportionBounds, ProportionalRules,
    ReallocationRecord, Reserve, ReservePolicy, Reserves, TargetId, TargetType,
};
pub use domain::combination::{
    CombinationElement, CombinationId, CombinationInput, CombinationResult, ElementValue,
    OverallSuccess, PerformanceMetrics, SuccessClassification, SuccessGrade,
};
pub use domain::pattern::{FailurePattern, OptimalCombination, PatternAnalysis, SuccessPattern};
pub use domain::product::{Product, ProductId};
pub use domain::terms::{
    Applicability, ApprovalStatus, CustomerId, CustomerTier, CustomerType, DiscountType, TermId,
    TermType, TradingTerm, VolumeTier,
};
pub use errors::EngineError;
pub use mining::{
    summary::{summarize, AnalysisSummary},
    MiningLimits, PatternMiner,
};
pub use pricing::{
    applies_to, calculate_discount, resolve_tier, DeterministicTermPricer, OrderContext,
    TermPricer, TierQuote,
};
pub use scoring::{ScoreWeights, SuccessScorer};
