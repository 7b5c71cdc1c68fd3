use rand::seq::SliceRandom;
use rand::Rng;
use trivia_common::{QuizItem, RawQuestion};
use uuid::Uuid;

/// Turn an upstream question into a servable item: a fresh id and the
/// correct answer shuffled in among the incorrect ones.
pub fn build_item<R: Rng>(raw: RawQuestion, rng: &mut R) -> QuizItem {
    let mut options = raw.incorrect_answers;
    options.push(raw.correct_answer.clone());
    options.shuffle(rng);

    QuizItem {
        id: Uuid::new_v4().to_string(),
        question: raw.question,
        options,
        correct_answer: raw.correct_answer,
        difficulty: raw.difficulty,
        category: raw.category,
        kind: raw.kind,
    }
}

pub fn build_batch<R: Rng>(raws: Vec<RawQuestion>, rng: &mut R) -> Vec<QuizItem> {
    raws.into_iter().map(|raw| build_item(raw, &mut *rng)).collect()
}
