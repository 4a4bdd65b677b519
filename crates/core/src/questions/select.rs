use crate::domain::questionnaire::QUESTIONS_PER_SESSION;
use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffles `questions` and keeps at most `limit` of them.
pub fn select_questions<R: Rng + ?Sized>(
    questions: &[String],
    limit: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut shuffled = questions.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(limit);
    shuffled
}

pub fn select_for_session(questions: &[String]) -> Vec<String> {
    select_questions(questions, QUESTIONS_PER_SESSION, &mut rand::rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn questions(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Will event {i} happen?")).collect()
    }

    #[test]
    fn caps_at_ten_from_larger_pool() {
        let pool = questions(25);
        let picked = select_for_session(&pool);
        assert_eq!(picked.len(), 10);

        let unique: BTreeSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 10);
        assert!(picked.iter().all(|q| pool.contains(q)));
    }

    #[test]
    fn shorter_pool_is_returned_whole() {
        let pool = questions(3);
        let picked = select_for_session(&pool);
        assert_eq!(picked.len(), 3);

        let mut sorted = picked.clone();
        sorted.sort();
        let mut expected = pool.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn empty_pool_yields_nothing() {
        assert!(select_for_session(&[]).is_empty());
    }

    #[test]
    fn seeded_rng_is_deterministic() {
        let pool = questions(20);
        let a = select_questions(&pool, 10, &mut StdRng::seed_from_u64(7));
        let b = select_questions(&pool, 10, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}
