//! Multi-stage movie resolution
//!
//! Three stages run strictly in order: exact-title lookup from the analysis,
//! the curated fallback library, then free-text search. The first accepted,
//! non-excluded record wins. A stage that fails upstream is logged and
//! treated as a miss so the cascade advances; only total exhaustion is
//! reported to the caller.

use crate::models::{MovieRecord, PromptAnalysis, SearchHit};
use crate::services::providers::MovieDatabase;
use crate::services::{analysis, library};

const MAX_QUERY_KEYWORDS: usize = 5;
const MAX_RAW_QUERY_LEN: usize = 60;

/// A resolved movie plus whether the year constraint had to be dropped
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionResult {
    pub movie: MovieRecord,
    pub year_relaxed: bool,
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    TitleLookup,
    CuratedFallback,
    FreeTextSearch,
}

const STAGES: [Stage; 3] = [
    Stage::TitleLookup,
    Stage::CuratedFallback,
    Stage::FreeTextSearch,
];

enum StageOutcome {
    Accepted {
        movie: MovieRecord,
        year_relaxed: bool,
    },
    Skip,
}

struct StageContext<'a> {
    db: &'a dyn MovieDatabase,
    analysis: &'a PromptAnalysis,
    prompt: &'a str,
    year: Option<&'a str>,
    exclude_ids: &'a [String],
}

impl StageContext<'_> {
    fn is_excluded(&self, imdb_id: &str) -> bool {
        self.exclude_ids.iter().any(|id| id == imdb_id)
    }

    /// Title lookup that treats upstream failure as a miss
    async fn lookup_title(&self, title: &str, year: Option<&str>) -> Option<MovieRecord> {
        match self.db.find_by_title(title, year).await {
            Ok(found) => found,
            Err(error) => {
                tracing::warn!(error = %error, title = %title, "title lookup failed");
                None
            }
        }
    }

    /// First non-excluded search hit, upstream failure treated as a miss
    async fn search_first(&self, query: &str, year: Option<&str>) -> Option<SearchHit> {
        match self.db.search(query, year).await {
            Ok(hits) => hits.into_iter().find(|hit| !self.is_excluded(&hit.imdb_id)),
            Err(error) => {
                tracing::warn!(error = %error, query = %query, "search failed");
                None
            }
        }
    }
}

/// Resolves (analysis, prompt, year, exclusions) to one movie record
///
/// `None` means every stage was exhausted.
pub async fn resolve(
    db: &dyn MovieDatabase,
    analysis: &PromptAnalysis,
    prompt: &str,
    year: Option<&str>,
    exclude_ids: &[String],
) -> Option<ResolutionResult> {
    let ctx = StageContext {
        db,
        analysis,
        prompt,
        year,
        exclude_ids,
    };

    for stage in STAGES {
        let outcome = match stage {
            Stage::TitleLookup => title_stage(&ctx).await,
            Stage::CuratedFallback => curated_stage(&ctx).await,
            Stage::FreeTextSearch => search_stage(&ctx).await,
        };
        if let StageOutcome::Accepted {
            movie,
            year_relaxed,
        } = outcome
        {
            tracing::info!(
                stage = ?stage,
                imdb_id = %movie.imdb_id,
                year_relaxed,
                "movie resolved"
            );
            return Some(ResolutionResult {
                movie,
                year_relaxed,
            });
        }
    }

    None
}

/// Stage 1: exact-title lookup from the analysis, preferring the request
/// year over the analysis year, then relaxing the year entirely
async fn title_stage(ctx: &StageContext<'_>) -> StageOutcome {
    let Some(title) = ctx.analysis.title.as_deref() else {
        return StageOutcome::Skip;
    };
    let preferred_year = ctx.year.or(ctx.analysis.year.as_deref());

    if let Some(movie) = ctx.lookup_title(title, preferred_year).await {
        if !ctx.is_excluded(&movie.imdb_id) {
            return StageOutcome::Accepted {
                movie,
                year_relaxed: false,
            };
        }
    }

    if preferred_year.is_some() {
        if let Some(movie) = ctx.lookup_title(title, None).await {
            if !ctx.is_excluded(&movie.imdb_id) {
                return StageOutcome::Accepted {
                    movie,
                    year_relaxed: true,
                };
            }
        }
    }

    StageOutcome::Skip
}

/// Stage 2: curated fallback titles, first with the request year, then the
/// identical candidate list without it
async fn curated_stage(ctx: &StageContext<'_>) -> StageOutcome {
    let candidates = library::pick_fallback_titles(ctx.prompt, ctx.analysis);

    for title in &candidates {
        if let Some(movie) = ctx.lookup_title(title, ctx.year).await {
            if !ctx.is_excluded(&movie.imdb_id) {
                return StageOutcome::Accepted {
                    movie,
                    year_relaxed: false,
                };
            }
        }
    }

    if ctx.year.is_some() {
        for title in &candidates {
            if let Some(movie) = ctx.lookup_title(title, None).await {
                if !ctx.is_excluded(&movie.imdb_id) {
                    return StageOutcome::Accepted {
                        movie,
                        year_relaxed: true,
                    };
                }
            }
        }
    }

    StageOutcome::Skip
}

/// Builds the free-text query: keywords first, then significant prompt
/// terms, then the truncated prompt; the year is appended only to the
/// term-derived forms
fn build_query(analysis: &PromptAnalysis, prompt: &str, year: Option<&str>) -> String {
    if !analysis.keywords.is_empty() {
        return analysis
            .keywords
            .iter()
            .take(MAX_QUERY_KEYWORDS)
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");
    }

    let terms = analysis::search_terms(prompt);
    let trimmed = if terms.is_empty() {
        prompt.trim().chars().take(MAX_RAW_QUERY_LEN).collect()
    } else {
        terms.join(" ")
    };
    match year {
        Some(year) => format!("{} {}", trimmed, year),
        None => trimmed,
    }
}

/// Stage 3: free-text search, retrying with the raw prompt and then without
/// the year constraint before resolving the hit to a detail record
async fn search_stage(ctx: &StageContext<'_>) -> StageOutcome {
    let query = build_query(ctx.analysis, ctx.prompt, ctx.year);
    let mut year_relaxed = false;

    let mut hit = ctx.search_first(&query, ctx.year).await;
    if hit.is_none() && query != ctx.prompt {
        hit = ctx.search_first(ctx.prompt, ctx.year).await;
    }
    if hit.is_none() && ctx.year.is_some() {
        hit = ctx.search_first(&query, None).await;
        if hit.is_none() && query != ctx.prompt {
            hit = ctx.search_first(ctx.prompt, None).await;
        }
        if hit.is_some() {
            year_relaxed = true;
        }
    }

    let Some(hit) = hit else {
        return StageOutcome::Skip;
    };

    match ctx.db.find_by_id(&hit.imdb_id).await {
        Ok(Some(movie)) => StageOutcome::Accepted {
            movie,
            year_relaxed,
        },
        Ok(None) => StageOutcome::Skip,
        Err(error) => {
            tracing::warn!(error = %error, imdb_id = %hit.imdb_id, "detail lookup failed");
            StageOutcome::Skip
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::providers::MockMovieDatabase;

    fn movie(imdb_id: &str, title: &str) -> MovieRecord {
        MovieRecord {
            imdb_id: imdb_id.to_string(),
            title: title.to_string(),
            year: None,
            poster: None,
            plot: None,
            genre: None,
            imdb_rating: None,
            runtime: None,
            extra: serde_json::Map::new(),
        }
    }

    fn hit(imdb_id: &str, title: &str) -> SearchHit {
        SearchHit {
            imdb_id: imdb_id.to_string(),
            title: title.to_string(),
            year: None,
            poster: None,
        }
    }

    fn titled_analysis(title: &str) -> PromptAnalysis {
        PromptAnalysis {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_title_stage_year_relaxation() {
        let mut db = MockMovieDatabase::new();
        db.expect_find_by_title()
            .withf(|title, year| title == "Inception" && year == &Some("1999"))
            .returning(|_, _| Ok(None));
        db.expect_find_by_title()
            .withf(|title, year| title == "Inception" && year.is_none())
            .returning(|_, _| Ok(Some(movie("tt1375666", "Inception"))));

        let result = resolve(
            &db,
            &titled_analysis("Inception"),
            "inception dream heist",
            Some("1999"),
            &[],
        )
        .await
        .unwrap();

        assert_eq!(result.movie.imdb_id, "tt1375666");
        assert!(result.year_relaxed);
    }

    #[tokio::test]
    async fn test_analysis_year_used_when_no_override() {
        let analysis = PromptAnalysis {
            title: Some("Arrival".to_string()),
            year: Some("2016".to_string()),
            ..Default::default()
        };
        let mut db = MockMovieDatabase::new();
        db.expect_find_by_title()
            .withf(|title, year| title == "Arrival" && year == &Some("2016"))
            .returning(|_, _| Ok(Some(movie("tt2543164", "Arrival"))));

        let result = resolve(&db, &analysis, "aliens linguistics", None, &[])
            .await
            .unwrap();
        assert_eq!(result.movie.imdb_id, "tt2543164");
        assert!(!result.year_relaxed);
    }

    #[tokio::test]
    async fn test_excluded_title_advances_to_curated_stage() {
        let mut db = MockMovieDatabase::new();
        db.expect_find_by_title().returning(|title, _| {
            Ok(match title {
                "Chef" => Some(movie("tt2883512", "Chef")),
                "Paddington 2" => Some(movie("tt4468740", "Paddington 2")),
                _ => None,
            })
        });

        let exclude = vec!["tt2883512".to_string()];
        let result = resolve(&db, &titled_analysis("Chef"), "feel-good", None, &exclude)
            .await
            .unwrap();

        // Chef is excluded in both stages; the curated list advances past it
        assert_eq!(result.movie.imdb_id, "tt4468740");
        assert!(!result.year_relaxed);
    }

    #[tokio::test]
    async fn test_search_stage_filters_exclusions() {
        let mut db = MockMovieDatabase::new();
        db.expect_search().returning(|_, _| {
            Ok(vec![hit("tt-first", "First"), hit("tt-second", "Second")])
        });
        db.expect_find_by_id()
            .withf(|id| id == "tt-second")
            .returning(|_| Ok(Some(movie("tt-second", "Second"))));

        let exclude = vec!["tt-first".to_string()];
        let result = resolve(
            &db,
            &PromptAnalysis::default(),
            "zzzz qqqq",
            None,
            &exclude,
        )
        .await
        .unwrap();

        assert_eq!(result.movie.imdb_id, "tt-second");
    }

    #[tokio::test]
    async fn test_search_stage_year_relaxation() {
        let mut db = MockMovieDatabase::new();
        db.expect_search().returning(|query, year| {
            Ok(if query == "space heist" && year.is_none() {
                vec![hit("tt-space", "Space Heist")]
            } else {
                vec![]
            })
        });
        db.expect_find_by_id()
            .returning(|_| Ok(Some(movie("tt-space", "Space Heist"))));

        let result = resolve(
            &db,
            &PromptAnalysis::default(),
            "space heist",
            Some("2030"),
            &[],
        )
        .await
        .unwrap();

        assert_eq!(result.movie.imdb_id, "tt-space");
        assert!(result.year_relaxed);
    }

    #[tokio::test]
    async fn test_exhaustion_returns_none() {
        let mut db = MockMovieDatabase::new();
        db.expect_find_by_title().returning(|_, _| Ok(None));
        db.expect_search().returning(|_, _| Ok(vec![]));

        let result = resolve(
            &db,
            &titled_analysis("Nonexistent Movie"),
            "feel-good",
            None,
            &[],
        )
        .await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_stage_errors_are_silent_and_cascade_advances() {
        let mut db = MockMovieDatabase::new();
        db.expect_find_by_title()
            .returning(|_, _| Err(AppError::Upstream("boom".to_string())));
        db.expect_search().returning(|query, _| {
            Ok(if query == "zzzz qqqq" {
                vec![hit("tt-found", "Found")]
            } else {
                vec![]
            })
        });
        db.expect_find_by_id()
            .returning(|_| Ok(Some(movie("tt-found", "Found"))));

        // Title stage errors, curated stage errors on every candidate, search
        // still resolves
        let result = resolve(
            &db,
            &titled_analysis("Chef"),
            "zzzz qqqq",
            None,
            &[],
        )
        .await
        .unwrap();
        assert_eq!(result.movie.imdb_id, "tt-found");
    }

    #[test]
    fn test_build_query_prefers_keywords() {
        let analysis = PromptAnalysis {
            keywords: vec![
                "comedy".to_string(),
                "uplifting".to_string(),
                "cooking".to_string(),
                "family".to_string(),
                "road".to_string(),
                "extra".to_string(),
            ],
            ..Default::default()
        };
        // Year is not appended to the keyword form
        assert_eq!(
            build_query(&analysis, "whatever", Some("2014")),
            "comedy uplifting cooking family road"
        );
    }

    #[test]
    fn test_build_query_terms_with_year() {
        assert_eq!(
            build_query(&PromptAnalysis::default(), "a space heist movie", Some("2014")),
            "space heist 2014"
        );
        assert_eq!(
            build_query(&PromptAnalysis::default(), "a space heist movie", None),
            "space heist"
        );
    }

    #[test]
    fn test_build_query_truncates_raw_prompt() {
        let prompt = "the ".repeat(40);
        let query = build_query(&PromptAnalysis::default(), &prompt, None);
        assert!(query.len() <= MAX_RAW_QUERY_LEN);
    }
}
