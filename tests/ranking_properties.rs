use entity_ranker::{CandidatesInfo, CancelToken, Entity, EntityContext, RankingEngine};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Candidates whose ids are their positions, so a scorer can look up a score by id
fn candidates(n: usize) -> Vec<Entity> {
    (0..n)
        .map(|i| Entity::new(i.to_string(), format!("Entity {}", i)))
        .collect()
}

fn score_of(scores: &[u8], entity: &Entity) -> anyhow::Result<f64> {
    let index: usize = entity.id.parse()?;
    Ok(f64::from(scores[index]))
}

proptest! {
    #[test]
    fn top_k_is_sorted_stable_and_clamped(
        scores in prop::collection::vec(0u8..5, 0..24),
        k in 0usize..32,
    ) {
        let engine = RankingEngine::new(
            |e: &Entity, _: &CandidatesInfo, _: &EntityContext, _: &str, _: usize| score_of(&scores, e),
        );
        let info = CandidatesInfo::new(candidates(scores.len()));
        let mut context = EntityContext::default();

        let results = engine.top_k_entities(&info, &mut context, "q", 1, k).unwrap();

        prop_assert_eq!(results.len(), k.min(scores.len()));
        for pair in results.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                let a: usize = pair[0].entity.id.parse().unwrap();
                let b: usize = pair[1].entity.id.parse().unwrap();
                prop_assert!(a < b, "tie order broken: {} before {}", a, b);
            }
        }
        // The cache is only for top-1
        prop_assert!(info.max_score().is_none());
    }

    #[test]
    fn top_one_is_first_maximum(scores in prop::collection::vec(0u8..5, 1..24)) {
        let calls = AtomicUsize::new(0);
        let engine = RankingEngine::new(
            |e: &Entity, _: &CandidatesInfo, _: &EntityContext, _: &str, _: usize| {
                calls.fetch_add(1, Ordering::SeqCst);
                score_of(&scores, e)
            },
        );
        let info = CandidatesInfo::new(candidates(scores.len()));
        let mut context = EntityContext::default();

        let best = engine.highest_ranked_entity(&info, &mut context, "q", 1).unwrap();
        let max = scores.iter().copied().max().unwrap();
        let first_max = scores.iter().position(|&s| s == max).unwrap();

        prop_assert_eq!(best.entity.id, first_max.to_string());
        prop_assert_eq!(best.score, f64::from(max));
        prop_assert_eq!(context.entities_for_scoring().len(), scores.len());

        // Memoized: a second call scores nothing
        let again = engine.highest_ranked_entity(&info, &mut context, "q", 1).unwrap();
        prop_assert_eq!(again.entity.id, first_max.to_string());
        prop_assert_eq!(calls.load(Ordering::SeqCst), scores.len());
    }

    #[test]
    fn top_one_matches_head_of_top_k(scores in prop::collection::vec(0u8..5, 1..24)) {
        let engine = RankingEngine::new(
            |e: &Entity, _: &CandidatesInfo, _: &EntityContext, _: &str, _: usize| score_of(&scores, e),
        );
        let info = CandidatesInfo::new(candidates(scores.len()));
        let mut context = EntityContext::default();

        let top = engine.top_k_entities(&info, &mut context, "q", 1, 1).unwrap();
        let best = engine.highest_ranked_entity(&info, &mut context, "q", 1).unwrap();
        prop_assert_eq!(&top[0].entity, &best.entity);
        prop_assert_eq!(top[0].score, best.score);
    }

    #[test]
    fn cancelled_ranking_returns_nothing(scores in prop::collection::vec(0u8..5, 1..24)) {
        let engine = RankingEngine::new(
            |e: &Entity, _: &CandidatesInfo, _: &EntityContext, _: &str, _: usize| score_of(&scores, e),
        );
        let info = CandidatesInfo::new(candidates(scores.len()));
        let mut context = EntityContext::default();
        let cancel = CancelToken::new();
        cancel.cancel();

        let err = engine
            .top_k_entities_with_cancel(&info, &mut context, "q", 1, scores.len(), &cancel)
            .unwrap_err();
        prop_assert!(err.is_cancelled());
    }
}
