//! Analysis orchestration: aggregation of scores and result assembly

use crate::enhance::{EnhancementOutcome, Enhancer, FallbackReason};
use crate::error::Result;
use crate::insights::synthesize;
use crate::missing_files::detect_missing_files;
use crate::scoring::score_all;
use crate::tech_stack::detect_tech_stack;
use crate::types::{
    AnalysisResult, ComplexityLevel, Narrative, RepoHealth, RepositorySnapshot, ScoreBreakdown,
    TeamSize,
};
use chrono::Utc;
use tracing::{debug, info, warn};

impl ComplexityLevel {
    /// Bucket a repository by its file count
    pub fn from_file_count(files: usize) -> Self {
        if files > 500 {
            Self::VeryHigh
        } else if files > 100 {
            Self::High
        } else if files > 30 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl RepoHealth {
    /// Health tier for an overall score
    pub fn from_score(score: u8) -> Self {
        if score >= 85 {
            Self::Excellent
        } else if score >= 70 {
            Self::Good
        } else if score >= 50 {
            Self::Fair
        } else if score >= 30 {
            Self::NeedsWork
        } else {
            Self::Critical
        }
    }
}

impl TeamSize {
    /// Estimate team size from the contributor sample
    pub fn from_contributors(count: usize) -> Self {
        if count >= 10 {
            Self::Large
        } else if count >= 5 {
            Self::Medium
        } else if count >= 2 {
            Self::Small
        } else {
            Self::Solo
        }
    }
}

/// Analyze a repository snapshot using only the deterministic engine.
///
/// Fails only when the snapshot does not have the documented shape.
pub fn analyze(snapshot: &RepositorySnapshot) -> Result<AnalysisResult> {
    info!("Analyzing repository {}", snapshot.repository.full_name);
    snapshot.validate()?;

    let scores = score_all(snapshot);
    let narrative = synthesize(snapshot, &scores);

    Ok(assemble(snapshot, scores, narrative, false))
}

/// Analyze a snapshot, letting the enhancement provider replace the narrative.
///
/// Scores, tech stack and missing files are identical to [`analyze`]; any
/// enhancement failure keeps the deterministic narrative.
pub async fn analyze_with_enhancement(
    snapshot: &RepositorySnapshot,
    enhancer: &Enhancer,
) -> Result<AnalysisResult> {
    info!("Analyzing repository {}", snapshot.repository.full_name);
    snapshot.validate()?;

    let scores = score_all(snapshot);

    let (narrative, ai_powered) = match enhancer.enhance(snapshot, &scores).await {
        EnhancementOutcome::Enhanced(narrative) => {
            debug!("Using enhanced narrative for {}", snapshot.repository.full_name);
            (narrative, true)
        }
        EnhancementOutcome::Fallback(FallbackReason::NotConfigured) => {
            debug!("Enhancement not configured, using deterministic insights");
            (synthesize(snapshot, &scores), false)
        }
        EnhancementOutcome::Fallback(reason) => {
            warn!(
                "Enhancement failed for {} ({}), using deterministic insights",
                snapshot.repository.full_name, reason
            );
            (synthesize(snapshot, &scores), false)
        }
    };

    Ok(assemble(snapshot, scores, narrative, ai_powered))
}

fn assemble(
    snapshot: &RepositorySnapshot,
    scores: ScoreBreakdown,
    narrative: Narrative,
    ai_powered: bool,
) -> AnalysisResult {
    let tech_stack = detect_tech_stack(snapshot);
    let missing_files = detect_missing_files(snapshot);
    let repo_health = RepoHealth::from_score(scores.overall);

    info!(
        "Analysis of {} complete: overall {}/100 ({}), {} insights, {} missing files",
        snapshot.repository.full_name,
        scores.overall,
        repo_health,
        narrative.insights.len(),
        missing_files.len()
    );

    AnalysisResult {
        full_name: snapshot.repository.full_name.clone(),
        readme_score: scores.documentation,
        scores,
        insights: narrative.insights,
        tech_stack,
        missing_files,
        summary: narrative.summary,
        suggestions: narrative.suggestions,
        complexity_level: ComplexityLevel::from_file_count(snapshot.file_count()),
        estimated_team_size: TeamSize::from_contributors(snapshot.contributors.len()),
        repo_health,
        analyzed_at: Utc::now(),
        ai_powered,
    }
}
