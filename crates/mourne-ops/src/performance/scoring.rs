//! Linear transfer functions from aggregate metrics to 0–100 domain scores.
//!
//! Each metric maps to its own 0–100 score; a domain score is the plain mean of whichever
//! metric scores could be computed. Missing inputs drop out of the mean instead of
//! counting as zero.

use super::aggregate::AggregateRow;
use super::domain::ScoreDomain;
use super::normalizer::clamp;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMetric {
    Dot,
    ExtremeLates,
    RackAndLoad,
    LabourPercent,
    FoodVariance,
    Stars,
    PointsLost,
}

impl ScoreMetric {
    pub const fn domain(self) -> ScoreDomain {
        match self {
            Self::Dot | Self::ExtremeLates | Self::RackAndLoad => ScoreDomain::Service,
            Self::LabourPercent | Self::FoodVariance => ScoreDomain::Cost,
            Self::Stars | Self::PointsLost => ScoreDomain::Osa,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dot => "DOT %",
            Self::ExtremeLates => "Extreme lates %",
            Self::RackAndLoad => "R&L minutes",
            Self::LabourPercent => "Labour %",
            Self::FoodVariance => "Food variance %",
            Self::Stars => "OSA stars",
            Self::PointsLost => "OSA points lost",
        }
    }
}

/// `dot` is a 0–1 on-time rate.
pub fn dot_score(dot: f64) -> f64 {
    clamp(dot * 100.0, 0.0, 100.0)
}

/// `extremes` is a 0–1 rate; each percentage point costs ten.
pub fn extremes_score(extremes: f64) -> f64 {
    clamp(100.0 - extremes * 1000.0, 0.0, 100.0)
}

/// Five points per rack-and-load minute.
pub fn rnl_score(minutes: f64) -> f64 {
    clamp(100.0 - minutes * 5.0, 0.0, 100.0)
}

/// `labour_percent` is in percentage points.
pub fn labour_score(labour_percent: f64) -> f64 {
    clamp(100.0 - labour_percent, 0.0, 100.0)
}

/// Over- and under-usage are penalised alike.
pub fn food_variance_score(variance_percent: f64) -> f64 {
    clamp(100.0 - variance_percent.abs() * 10.0, 0.0, 100.0)
}

/// `stars` on the 0–5 audit scale.
pub fn stars_score(stars: f64) -> f64 {
    clamp(stars / 5.0 * 100.0, 0.0, 100.0)
}

pub fn points_lost_score(points_lost: f64) -> f64 {
    clamp(100.0 - points_lost * 10.0, 0.0, 100.0)
}

/// Mean of the present values, or `None` when there are none.
pub fn mean_of_present<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SubScores {
    pub service: Option<f64>,
    pub cost: Option<f64>,
    pub osa: Option<f64>,
}

impl SubScores {
    pub fn get(&self, domain: ScoreDomain) -> Option<f64> {
        match domain {
            ScoreDomain::Service => self.service,
            ScoreDomain::Cost => self.cost,
            ScoreDomain::Osa => self.osa,
        }
    }

    /// The MPI: mean of the domain scores that exist.
    pub fn composite(&self) -> Option<f64> {
        mean_of_present([self.service, self.cost, self.osa])
    }

    /// Lowest-scoring domain that has a score.
    pub fn weakest(&self) -> Option<(ScoreDomain, f64)> {
        ScoreDomain::ordered()
            .into_iter()
            .filter_map(|domain| self.get(domain).map(|score| (domain, score)))
            .min_by(|left, right| left.1.total_cmp(&right.1))
    }
}

/// One metric's contribution, kept so a score can be explained line by line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub metric: ScoreMetric,
    pub domain: ScoreDomain,
    pub input: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCard {
    pub scores: SubScores,
    pub composite: Option<f64>,
    pub components: Vec<ScoreComponent>,
}

/// Stateless scorer for aggregate rows.
pub struct Scorer;

impl Scorer {
    pub fn score(row: &AggregateRow) -> ScoreCard {
        let inputs = [
            (ScoreMetric::Dot, row.dot),
            (ScoreMetric::ExtremeLates, row.extremes),
            (ScoreMetric::RackAndLoad, row.rnl_minutes),
            (ScoreMetric::LabourPercent, row.labour_percent),
            (ScoreMetric::FoodVariance, row.food_variance_percent),
            (ScoreMetric::Stars, row.stars),
            (ScoreMetric::PointsLost, row.points_lost),
        ];

        let components: Vec<ScoreComponent> = inputs
            .into_iter()
            .filter_map(|(metric, input)| {
                input.map(|input| ScoreComponent {
                    metric,
                    domain: metric.domain(),
                    input,
                    score: transfer(metric, input),
                })
            })
            .collect();

        let domain_score = |domain: ScoreDomain| {
            mean_of_present(
                components
                    .iter()
                    .filter(|component| component.domain == domain)
                    .map(|component| Some(component.score)),
            )
        };

        let scores = SubScores {
            service: domain_score(ScoreDomain::Service),
            cost: domain_score(ScoreDomain::Cost),
            osa: domain_score(ScoreDomain::Osa),
        };

        ScoreCard {
            composite: scores.composite(),
            scores,
            components,
        }
    }
}

fn transfer(metric: ScoreMetric, input: f64) -> f64 {
    match metric {
        ScoreMetric::Dot => dot_score(input),
        ScoreMetric::ExtremeLates => extremes_score(input),
        ScoreMetric::RackAndLoad => rnl_score(input),
        ScoreMetric::LabourPercent => labour_score(input),
        ScoreMetric::FoodVariance => food_variance_score(input),
        ScoreMetric::Stars => stars_score(input),
        ScoreMetric::PointsLost => points_lost_score(input),
    }
}
