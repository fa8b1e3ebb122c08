//! Single-pass aggregation of Likert responses into a dashboard report.
//!
//! Each scored row feeds the global, pillar, department, day and
//! employee buckets at once. Buckets remember insertion order so that
//! ties in the derived rankings resolve to the first one seen.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::report::{
    AnalyticsReport, CoverageEntry, DepartmentDistribution, Distribution, EmployeePoint,
    FiltersSummary, HeatmapCell, HeatmapRow, Kpis, PillarDistribution, PillarHighlight, Ranking,
    RankingEntry, TimelinePoint,
};
use super::snapshot::{AnalyticsRow, AnalyticsSnapshot, DepartmentKey};
use super::AnalyticsQuery;
use crate::domain::foundation::{EmployeeId, PillarId};
use crate::domain::likert::LIKERT_LEVELS;
use crate::domain::scoring::{
    contribution_weight, level_of, likert_value, ratio_percent, round1, LevelHistogram,
    WeightedScore, LIKERT_MIN,
};

/// Label of the bucket holding employees without a department.
pub const NO_DEPARTMENT_LABEL: &str = "No department";

const RANKING_SIZE: usize = 5;
const TREND_WINDOW_DAYS: i64 = 30;

#[derive(Debug)]
struct PillarBucket {
    id: PillarId,
    name: String,
    score: WeightedScore,
    levels: LevelHistogram,
}

#[derive(Debug)]
struct DepartmentBucket {
    key: DepartmentKey,
    score: WeightedScore,
    pillars: HashMap<PillarId, (WeightedScore, LevelHistogram)>,
}

#[derive(Debug, Default)]
struct DayBucket {
    score: WeightedScore,
    pillars: BTreeMap<PillarId, WeightedScore>,
}

#[derive(Debug)]
struct EmployeeBucket {
    id: EmployeeId,
    name: String,
    score: WeightedScore,
}

/// Vec-backed map that keeps first-insertion order.
#[derive(Debug)]
struct Ordered<K, V> {
    index: HashMap<K, usize>,
    items: Vec<V>,
}

impl<K: std::hash::Hash + Eq + Copy, V> Ordered<K, V> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            items: Vec::new(),
        }
    }

    fn entry(&mut self, key: K, make: impl FnOnce() -> V) -> &mut V {
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.items.push(make());
                let idx = self.items.len() - 1;
                self.index.insert(key, idx);
                idx
            }
        };
        &mut self.items[idx]
    }
}

/// Accumulator for one aggregation call.
#[derive(Debug)]
pub struct Aggregation {
    include_timeline: bool,
    global: WeightedScore,
    pillars: Ordered<PillarId, PillarBucket>,
    departments: Ordered<DepartmentKey, DepartmentBucket>,
    days: BTreeMap<NaiveDate, DayBucket>,
    employees: Ordered<EmployeeId, EmployeeBucket>,
    respondents: HashSet<EmployeeId>,
    scored_rows: usize,
}

impl Aggregation {
    pub fn new(include_timeline: bool) -> Self {
        Self {
            include_timeline,
            global: WeightedScore::default(),
            pillars: Ordered::new(),
            departments: Ordered::new(),
            days: BTreeMap::new(),
            employees: Ordered::new(),
            respondents: HashSet::new(),
            scored_rows: 0,
        }
    }

    /// Folds one row in. Returns `false` when the value does not score.
    pub fn push(&mut self, row: &AnalyticsRow) -> bool {
        let Some(value) = likert_value(&row.value).value() else {
            return false;
        };
        let weight = contribution_weight(row.question_weight, row.pillar_weight);
        self.scored_rows += 1;

        self.global.add(value, weight);

        let pillar = self.pillars.entry(row.pillar_id, || PillarBucket {
            id: row.pillar_id,
            name: row.pillar_name.clone(),
            score: WeightedScore::default(),
            levels: LevelHistogram::default(),
        });
        pillar.score.add(value, weight);
        pillar.levels.add(value, weight);

        if let Some(key) = row.department_key() {
            let dept = self.departments.entry(key, || DepartmentBucket {
                key,
                score: WeightedScore::default(),
                pillars: HashMap::new(),
            });
            dept.score.add(value, weight);
            let (score, levels) = dept.pillars.entry(row.pillar_id).or_default();
            score.add(value, weight);
            levels.add(value, weight);
        }

        if self.include_timeline {
            let day = self.days.entry(row.submitted_at.date_naive()).or_default();
            day.score.add(value, weight);
            day.pillars.entry(row.pillar_id).or_default().add(value, weight);
        }

        if let Some(respondent) = &row.respondent {
            self.respondents.insert(respondent.id);
            let employee = self.employees.entry(respondent.id, || EmployeeBucket {
                id: respondent.id,
                name: respondent.name.clone(),
                score: WeightedScore::default(),
            });
            employee.score.add(value, weight);
        }

        true
    }

    pub fn scored_rows(&self) -> usize {
        self.scored_rows
    }

    /// Derives the report. `snapshot` supplies names and the employee universe.
    pub fn finish(
        self,
        snapshot: &AnalyticsSnapshot,
        query: &AnalyticsQuery,
        generated_at: DateTime<Utc>,
    ) -> AnalyticsReport {
        let summary = FiltersSummary::new(query.scope, &query.filters);
        let universe = CoverageUniverse::new(snapshot, query);

        if self.global.is_empty() {
            return AnalyticsReport::empty(generated_at, summary, universe.total());
        }

        let department_name = |key: &DepartmentKey| -> String {
            match key {
                DepartmentKey::Department(id) => snapshot
                    .department_names
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| format!("Department {}", id)),
                DepartmentKey::NoDepartment => NO_DEPARTMENT_LABEL.to_string(),
            }
        };

        // KPIs read pillars in insertion order so the first of equals wins.
        let pillars_in_order: Vec<PillarDistribution> = self
            .pillars
            .items
            .iter()
            .map(|b| distribution(b.id, &b.name, &b.score, &b.levels))
            .collect();
        let strongest = pick(&pillars_in_order, |candidate, best| candidate > best);
        let weakest = pick(&pillars_in_order, |candidate, best| candidate < best);
        let pillar_gap = match (&strongest, &weakest) {
            (Some(s), Some(w)) if pillars_in_order.len() > 1 => round1(s.value - w.value),
            _ => 0.0,
        };

        let mut pillars = pillars_in_order;
        pillars.sort_by(|a, b| b.percent.total_cmp(&a.percent));
        let pillar_order: Vec<(PillarId, String)> = pillars
            .iter()
            .map(|p| (p.pillar_id, p.pillar_name.clone()))
            .collect();

        let mut departments: Vec<&DepartmentBucket> = self.departments.items.iter().collect();
        departments.sort_by(|a, b| b.score.percent().total_cmp(&a.score.percent()));

        let heatmap: Vec<HeatmapRow> = departments
            .iter()
            .map(|dept| HeatmapRow {
                department_id: dept.key.department_id(),
                department_name: department_name(&dept.key),
                average: dept.score.percent(),
                values: pillar_order
                    .iter()
                    .map(|(id, _)| HeatmapCell {
                        pillar_id: *id,
                        percent: dept.pillars.get(id).map_or(0.0, |(s, _)| s.percent()),
                    })
                    .collect(),
            })
            .collect();

        let by_department = departments
            .iter()
            .map(|dept| DepartmentDistribution {
                department_id: dept.key.department_id(),
                department_name: department_name(&dept.key),
                pillars: pillar_order
                    .iter()
                    .filter_map(|(id, name)| {
                        dept.pillars
                            .get(id)
                            .map(|(score, levels)| distribution(*id, name, score, levels))
                    })
                    .collect(),
            })
            .collect();

        let ranking_entry = |row: &HeatmapRow| RankingEntry {
            id: row.department_id,
            name: row.department_name.clone(),
            value: row.average,
        };
        let ranking = Ranking {
            top: heatmap.iter().take(RANKING_SIZE).map(ranking_entry).collect(),
            bottom: heatmap.iter().rev().take(RANKING_SIZE).map(ranking_entry).collect(),
        };

        let timeline: Vec<TimelinePoint> = self
            .days
            .iter()
            .map(|(date, day)| TimelinePoint {
                date: *date,
                global_percent: day.score.percent(),
                pillars: day.pillars.iter().map(|(id, s)| (*id, s.percent())).collect(),
            })
            .collect();
        let trend_30d = if self.include_timeline {
            trend(&self.days)
        } else {
            None
        };

        let mut employees: Vec<EmployeePoint> = self
            .employees
            .items
            .iter()
            .map(|e| EmployeePoint {
                id: e.id,
                name: e.name.clone(),
                percent: e.score.percent(),
                level: level_of(e.score.mean().unwrap_or(LIKERT_MIN)),
            })
            .collect();
        employees.sort_by(|a, b| b.percent.total_cmp(&a.percent));

        let coverage_respondents = universe.respondents(&self.respondents);
        let coverage_by_department = universe.by_department(&self.respondents, department_name);

        AnalyticsReport {
            generated_at,
            filters: summary,
            likert_levels: &LIKERT_LEVELS,
            kpis: Kpis {
                global_average: self.global.percent(),
                strongest_pillar: strongest,
                weakest_pillar: weakest,
                pillar_gap,
                coverage_percent: universe.percent(coverage_respondents),
                coverage_total: universe.total(),
                coverage_respondents,
                trend_30d,
            },
            distribution: Distribution {
                global: pillars.clone(),
                by_department,
            },
            pillars,
            heatmap,
            coverage_by_department,
            timeline,
            ranking,
            employees,
        }
    }
}

/// Aggregates a snapshot in one pass.
pub fn build_report(
    snapshot: &AnalyticsSnapshot,
    query: &AnalyticsQuery,
    generated_at: DateTime<Utc>,
) -> AnalyticsReport {
    let mut aggregation = Aggregation::new(query.include_timeline);
    for row in &snapshot.rows {
        aggregation.push(row);
    }
    aggregation.finish(snapshot, query, generated_at)
}

fn distribution(
    id: PillarId,
    name: &str,
    score: &WeightedScore,
    levels: &LevelHistogram,
) -> PillarDistribution {
    let breakdown = levels.breakdown(score.weight_sum);
    PillarDistribution {
        pillar_id: id,
        pillar_name: name.to_string(),
        percent: score.percent(),
        pct_ge4: round1(breakdown[3] + breakdown[4]),
        levels: breakdown,
    }
}

/// First pillar that no later pillar beats under `better`.
fn pick(pillars: &[PillarDistribution], better: impl Fn(f64, f64) -> bool) -> Option<PillarHighlight> {
    let mut best: Option<&PillarDistribution> = None;
    for p in pillars {
        match best {
            Some(b) if !better(p.percent, b.percent) => {}
            _ => best = Some(p),
        }
    }
    best.map(|p| PillarHighlight {
        id: p.pillar_id,
        name: p.pillar_name.clone(),
        value: p.percent,
    })
}

/// Percent change of the latest 30 days against the 30 days before them.
///
/// Windows are anchored on the latest day with data. `None` when the
/// previous window is empty or scores zero.
fn trend(days: &BTreeMap<NaiveDate, DayBucket>) -> Option<f64> {
    let (&latest, _) = days.iter().next_back()?;
    let recent_start = latest.checked_sub_signed(Duration::days(TREND_WINDOW_DAYS - 1))?;
    let previous_start = recent_start.checked_sub_signed(Duration::days(TREND_WINDOW_DAYS))?;

    let mut recent = WeightedScore::default();
    let mut previous = WeightedScore::default();
    for (date, day) in days.range(previous_start..) {
        if *date >= recent_start {
            recent.merge(&day.score);
        } else {
            previous.merge(&day.score);
        }
    }

    let before = previous.percent();
    if previous.is_empty() || before == 0.0 {
        return None;
    }
    Some(round1((recent.percent() - before) / before * 100.0))
}

/// Employees counted for coverage.
struct CoverageUniverse {
    members: Vec<(EmployeeId, DepartmentKey)>,
    /// Distinct employee filter ids, when an employee filter is present.
    explicit: Option<Vec<EmployeeId>>,
}

impl CoverageUniverse {
    fn new(snapshot: &AnalyticsSnapshot, query: &AnalyticsQuery) -> Self {
        let filters = &query.filters;
        let explicit = (!filters.employee_ids.is_empty()).then(|| filters.distinct_employee_ids());
        let members = snapshot
            .employees
            .iter()
            .filter(|e| filters.matches_universe(e.department_id))
            .filter(|e| explicit.as_ref().map_or(true, |ids| ids.contains(&e.id)))
            .map(|e| (e.id, DepartmentKey::from_employee(e.department_id)))
            .collect();
        Self { members, explicit }
    }

    fn total(&self) -> u32 {
        match &self.explicit {
            Some(ids) => ids.len() as u32,
            None => self.members.len() as u32,
        }
    }

    fn respondents(&self, answered: &HashSet<EmployeeId>) -> u32 {
        match &self.explicit {
            Some(ids) => ids.iter().filter(|id| answered.contains(id)).count() as u32,
            None => self
                .members
                .iter()
                .filter(|(id, _)| answered.contains(id))
                .count() as u32,
        }
    }

    fn percent(&self, respondents: u32) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| ratio_percent(f64::from(respondents), f64::from(total)))
    }

    fn by_department(
        &self,
        answered: &HashSet<EmployeeId>,
        name_of: impl Fn(&DepartmentKey) -> String,
    ) -> Vec<CoverageEntry> {
        let mut groups: Ordered<DepartmentKey, (DepartmentKey, u32, u32)> = Ordered::new();
        for (id, key) in &self.members {
            let group = groups.entry(*key, || (*key, 0, 0));
            group.1 += 1;
            if answered.contains(id) {
                group.2 += 1;
            }
        }

        let mut entries: Vec<CoverageEntry> = groups
            .items
            .into_iter()
            .map(|(key, total, respondents)| CoverageEntry {
                department_id: key.department_id(),
                department_name: name_of(&key),
                respondents,
                total,
                coverage_percent: ratio_percent(f64::from(respondents), f64::from(total)),
            })
            .collect();
        entries.sort_by(|a, b| b.coverage_percent.total_cmp(&a.coverage_percent));
        entries
    }
}
