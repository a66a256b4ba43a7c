//! HTTP Handlers

use axum::extract::{FromRef, Path, State};
use axum::http::StatusCode;
use std::sync::Arc;

use auth::{AuthUser, UserRepository};
use kernel::extract::{ApiJson, ApiQuery};
use kernel::id::{AnswerId, QuestionId, UserId};
use kernel::pagination::{Page, PageInfo};
use kernel::response::ApiResponse;
use platform::token::TokenService;

use crate::application::{
    AcceptAnswerUseCase, AskQuestionUseCase, Authors, BrowseAnswersUseCase,
    BrowseQuestionsUseCase, ManageAnswerUseCase, ManageQuestionUseCase, PostAnswerUseCase,
    VoteUseCase, WithAuthors,
};
use crate::domain::entities::Question;
use crate::domain::repository::{AnswerRepository, ForumUnitOfWork, QuestionRepository};
use crate::error::{ForumError, ForumResult};
use crate::presentation::dto::{
    AnswerEnvelope, AnswerListResponse, AnswerResponse, AnswerVoteRequest, CreateAnswerRequest,
    CreateQuestionRequest, PageQuery, QuestionDetail, QuestionEnvelope, QuestionListQuery,
    QuestionListResponse, QuestionRef, QuestionSummary, QuestionVoteRequest, UpdateAnswerRequest,
    UpdateQuestionRequest, VoteResponse,
};

/// Everything the forum handlers need from one storage backend
pub trait ForumStore:
    QuestionRepository + AnswerRepository + ForumUnitOfWork + Send + Sync + 'static
{
}

impl<T> ForumStore for T where
    T: QuestionRepository + AnswerRepository + ForumUnitOfWork + Send + Sync + 'static
{
}

/// Shared state for question and answer handlers
pub struct ForumAppState<F, U>
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    pub forum: Arc<F>,
    pub users: Arc<U>,
    pub tokens: Arc<TokenService>,
}

impl<F, U> ForumAppState<F, U>
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(forum: Arc<F>, users: Arc<U>, tokens: Arc<TokenService>) -> Self {
        Self {
            forum,
            users,
            tokens,
        }
    }
}

impl<F, U> Clone for ForumAppState<F, U>
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            forum: self.forum.clone(),
            users: self.users.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

impl<F, U> FromRef<ForumAppState<F, U>> for Arc<TokenService>
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    fn from_ref(state: &ForumAppState<F, U>) -> Self {
        state.tokens.clone()
    }
}

// Ids that do not parse address nothing
fn question_id(raw: &str) -> ForumResult<QuestionId> {
    raw.parse().map_err(|_| ForumError::QuestionNotFound)
}

fn answer_id(raw: &str) -> ForumResult<AnswerId> {
    raw.parse().map_err(|_| ForumError::AnswerNotFound)
}

fn question_list(page: WithAuthors<Page<Question>>, info: PageInfo) -> QuestionListResponse {
    let WithAuthors { item, authors } = page;
    QuestionListResponse {
        questions: item
            .items
            .iter()
            .map(|q| QuestionSummary::new(q, &authors))
            .collect(),
        pagination: info.into(),
    }
}

// ============================================================================
// Questions
// ============================================================================

/// GET /api/questions
pub async fn list_questions<F, U>(
    State(state): State<ForumAppState<F, U>>,
    ApiQuery(pairs): ApiQuery<Vec<(String, String)>>,
) -> ForumResult<ApiResponse<QuestionListResponse>>
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    let query = QuestionListQuery::from_pairs(pairs);
    let page = query.page_request();
    let filter = query.into_filter()?;

    let use_case =
        BrowseQuestionsUseCase::new(state.forum.clone(), state.forum.clone(), state.users.clone());
    let result = use_case.list(&filter, page).await?;

    let info = PageInfo::new(page, result.item.total);
    Ok(ApiResponse::data(question_list(result, info)))
}

/// GET /api/questions/user/{user_id}
pub async fn list_user_questions<F, U>(
    State(state): State<ForumAppState<F, U>>,
    Path(user_id): Path<String>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ForumResult<ApiResponse<QuestionListResponse>>
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    let author: UserId = user_id
        .parse()
        .map_err(|_| ForumError::InvalidFilter("Invalid user id"))?;
    let page = query.page_request();

    let use_case =
        BrowseQuestionsUseCase::new(state.forum.clone(), state.forum.clone(), state.users.clone());
    let result = use_case.by_author(author, page).await?;

    let info = PageInfo::new(page, result.item.total);
    Ok(ApiResponse::data(question_list(result, info)))
}

/// GET /api/questions/{id}
pub async fn get_question<F, U>(
    State(state): State<ForumAppState<F, U>>,
    Path(id): Path<String>,
) -> ForumResult<ApiResponse<QuestionEnvelope<QuestionDetail>>>
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    let id = question_id(&id)?;

    let use_case =
        BrowseQuestionsUseCase::new(state.forum.clone(), state.forum.clone(), state.users.clone());
    let thread = use_case.detail(&id).await?;

    Ok(ApiResponse::data(QuestionEnvelope {
        question: QuestionDetail::new(&thread.item, &thread.authors),
    }))
}

/// POST /api/questions
pub async fn create_question<F, U>(
    State(state): State<ForumAppState<F, U>>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateQuestionRequest>,
) -> ForumResult<(StatusCode, ApiResponse<QuestionEnvelope<QuestionRef>>)>
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    let input = req.validate()?;

    let question = AskQuestionUseCase::new(state.forum.clone(), state.users.clone())
        .execute(auth.user_id(), input)
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::data(QuestionEnvelope {
            question: QuestionRef {
                id: question.id.to_string(),
                title: question.title.as_str().to_owned(),
            },
        })
        .with_message("Question created successfully"),
    ))
}

/// PUT /api/questions/{id}
pub async fn update_question<F, U>(
    State(state): State<ForumAppState<F, U>>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateQuestionRequest>,
) -> ForumResult<ApiResponse<QuestionEnvelope<QuestionSummary>>>
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    let id = question_id(&id)?;
    let edit = req.validate()?;

    let updated = ManageQuestionUseCase::new(state.forum.clone(), state.users.clone())
        .update(auth.user_id(), &id, edit)
        .await?;

    Ok(ApiResponse::data(QuestionEnvelope {
        question: QuestionSummary::new(&updated.item, &updated.authors),
    })
    .with_message("Question updated successfully"))
}

/// DELETE /api/questions/{id}
pub async fn delete_question<F, U>(
    State(state): State<ForumAppState<F, U>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ForumResult<ApiResponse<()>>
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    let id = question_id(&id)?;

    ManageQuestionUseCase::new(state.forum.clone(), state.users.clone())
        .delete(auth.user_id(), &id)
        .await?;

    Ok(ApiResponse::<()>::message("Question deleted successfully"))
}

/// POST /api/questions/{id}/vote
pub async fn vote_question<F, U>(
    State(state): State<ForumAppState<F, U>>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<QuestionVoteRequest>,
) -> ForumResult<ApiResponse<VoteResponse>>
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    let id = question_id(&id)?;
    let vote_type = req.validate()?;

    let outcome = VoteUseCase::new(state.forum.clone(), state.forum.clone())
        .vote_question(auth.user_id(), &id, vote_type)
        .await?;

    Ok(ApiResponse::data(VoteResponse {
        votes: outcome.votes,
        user_vote: outcome.user_vote,
    })
    .with_message("Vote recorded successfully"))
}

// ============================================================================
// Answers
// ============================================================================

/// GET /api/answers/question/{question_id}
pub async fn list_answers<F, U>(
    State(state): State<ForumAppState<F, U>>,
    Path(raw_id): Path<String>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> ForumResult<ApiResponse<AnswerListResponse>>
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    let page = query.page_request();

    // An unknown question simply has no answers
    let result = match raw_id.parse::<QuestionId>() {
        Ok(id) => {
            BrowseAnswersUseCase::new(state.forum.clone(), state.users.clone())
                .list(&id, query.answer_sort(), page)
                .await?
        }
        Err(_) => WithAuthors {
            item: Page::new(Vec::new(), 0),
            authors: Authors::default(),
        },
    };

    let info = PageInfo::new(page, result.item.total);
    Ok(ApiResponse::data(AnswerListResponse {
        answers: result
            .item
            .items
            .iter()
            .map(|a| AnswerResponse::summary(a, &result.authors))
            .collect(),
        pagination: info.into(),
    }))
}

/// POST /api/answers
pub async fn create_answer<F, U>(
    State(state): State<ForumAppState<F, U>>,
    auth: AuthUser,
    ApiJson(req): ApiJson<CreateAnswerRequest>,
) -> ForumResult<(StatusCode, ApiResponse<AnswerEnvelope>)>
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    let input = req.validate()?;

    let created = PostAnswerUseCase::new(state.forum.clone(), state.forum.clone(), state.users.clone())
        .execute(auth.user_id(), input)
        .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::data(AnswerEnvelope {
            answer: AnswerResponse::with_votes(&created.item, &created.authors),
        })
        .with_message("Answer created successfully"),
    ))
}

/// PUT /api/answers/{id}
pub async fn update_answer<F, U>(
    State(state): State<ForumAppState<F, U>>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateAnswerRequest>,
) -> ForumResult<ApiResponse<AnswerEnvelope>>
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    let id = answer_id(&id)?;
    let content = req.validate()?;

    let updated =
        ManageAnswerUseCase::new(state.forum.clone(), state.forum.clone(), state.users.clone())
            .update(auth.user_id(), &id, content)
            .await?;

    Ok(ApiResponse::data(AnswerEnvelope {
        answer: AnswerResponse::with_votes(&updated.item, &updated.authors),
    })
    .with_message("Answer updated successfully"))
}

/// DELETE /api/answers/{id}
pub async fn delete_answer<F, U>(
    State(state): State<ForumAppState<F, U>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ForumResult<ApiResponse<()>>
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    let id = answer_id(&id)?;

    ManageAnswerUseCase::new(state.forum.clone(), state.forum.clone(), state.users.clone())
        .delete(auth.user_id(), &id)
        .await?;

    Ok(ApiResponse::<()>::message("Answer deleted successfully"))
}

/// POST /api/answers/{id}/vote
pub async fn vote_answer<F, U>(
    State(state): State<ForumAppState<F, U>>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<AnswerVoteRequest>,
) -> ForumResult<ApiResponse<VoteResponse>>
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    let id = answer_id(&id)?;
    let vote_type = req.validate()?;

    let outcome = VoteUseCase::new(state.forum.clone(), state.forum.clone())
        .vote_answer(auth.user_id(), &id, vote_type)
        .await?;

    Ok(ApiResponse::data(VoteResponse {
        votes: outcome.votes,
        user_vote: outcome.user_vote,
    })
    .with_message("Vote applied successfully"))
}

/// POST /api/answers/{id}/accept
pub async fn accept_answer<F, U>(
    State(state): State<ForumAppState<F, U>>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ForumResult<ApiResponse<AnswerEnvelope>>
where
    F: ForumStore,
    U: UserRepository + Send + Sync + 'static,
{
    let id = answer_id(&id)?;

    let accepted = AcceptAnswerUseCase::new(
        state.forum.clone(),
        state.forum.clone(),
        state.forum.clone(),
        state.users.clone(),
    )
    .execute(auth.user_id(), &id)
    .await?;

    Ok(ApiResponse::data(AnswerEnvelope {
        answer: AnswerResponse::with_votes(&accepted.item, &accepted.authors),
    })
    .with_message("Answer marked as accepted"))
}
