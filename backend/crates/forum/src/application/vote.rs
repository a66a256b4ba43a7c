//! Vote Use Case
//!
//! Questions toggle per user; answers replace the user's vote and refuse
//! self-votes. Either way the tally is recomputed from the vote records.

use std::sync::Arc;

use kernel::id::{AnswerId, QuestionId, UserId};

use crate::domain::repository::{AnswerRepository, QuestionRepository};
use crate::domain::value_objects::VoteType;
use crate::error::{ForumError, ForumResult};

/// Tally and the caller's vote after the change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    pub votes: i32,
    pub user_vote: Option<VoteType>,
}

pub struct VoteUseCase<Q, A>
where
    Q: QuestionRepository,
    A: AnswerRepository,
{
    question_repo: Arc<Q>,
    answer_repo: Arc<A>,
}

impl<Q, A> VoteUseCase<Q, A>
where
    Q: QuestionRepository,
    A: AnswerRepository,
{
    pub fn new(question_repo: Arc<Q>, answer_repo: Arc<A>) -> Self {
        Self {
            question_repo,
            answer_repo,
        }
    }

    pub async fn vote_question(
        &self,
        voter: UserId,
        id: &QuestionId,
        vote_type: VoteType,
    ) -> ForumResult<VoteOutcome> {
        let mut question = self
            .question_repo
            .find_active(id)
            .await?
            .ok_or(ForumError::QuestionNotFound)?;

        let user_vote = question.vote(voter, vote_type);
        self.question_repo.save(&question).await?;

        tracing::info!(
            question_id = %question.id,
            voter = %voter,
            votes = question.votes,
            "Question vote recorded"
        );

        Ok(VoteOutcome {
            votes: question.votes,
            user_vote,
        })
    }

    pub async fn vote_answer(
        &self,
        voter: UserId,
        id: &AnswerId,
        vote_type: Option<VoteType>,
    ) -> ForumResult<VoteOutcome> {
        let mut answer = self
            .answer_repo
            .find_active(id)
            .await?
            .ok_or(ForumError::AnswerNotFound)?;

        if answer.is_authored_by(&voter) {
            return Err(ForumError::Forbidden("You cannot vote on your own answer"));
        }

        let user_vote = answer.vote(voter, vote_type);
        self.answer_repo.save(&answer).await?;

        tracing::info!(
            answer_id = %answer.id,
            voter = %voter,
            votes = answer.votes,
            "Answer vote applied"
        );

        Ok(VoteOutcome {
            votes: answer.votes,
            user_vote,
        })
    }
}
