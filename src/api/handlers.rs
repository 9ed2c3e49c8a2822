use crate::{
    api::models::*,
    core::{
        errors::RoomFundError,
        models::{
            audit::{AppLog, RoomAudit},
            fund::FundSnapshot,
            room::Room,
            transaction::Transaction,
            user::User,
        },
        services::RoomFundService,
    },
    infrastructure::{
        fund::in_memory::InMemoryFundStore, logging::in_memory::InMemoryLogging, storage::in_memory::InMemoryStorage,
    },
};
use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::IntoResponse,
};
use http::header;

use std::sync::Arc;

type Service = Arc<RoomFundService<InMemoryLogging, InMemoryStorage, InMemoryFundStore>>;

/// Middleware to validate JWT
async fn auth_middleware(
    State(service): State<Service>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| RoomFundError::InvalidToken("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| RoomFundError::InvalidToken("Invalid Authorization header".to_string()))?;

    let claims = service.validate_token(token)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

// Define API routes
pub fn api_routes(service: Service) -> Router {
    let protected_routes = Router::new()
        .route("/users/{user_id}", axum::routing::get(get_user))
        .route("/rooms", axum::routing::post(create_room))
        .route("/rooms/{room_id}", axum::routing::get(get_room))
        .route("/rooms/join", axum::routing::post(join_room))
        .route("/rooms/{room_id}/members/confirm", axum::routing::post(confirm_member))
        .route("/rooms/{room_id}/members/remove", axum::routing::post(remove_member))
        .route(
            "/rooms/{room_id}/invite_code/regenerate",
            axum::routing::post(regenerate_invite_code),
        )
        .route(
            "/rooms/{room_id}/contributions",
            axum::routing::post(submit_contribution),
        )
        .route(
            "/rooms/{room_id}/reimbursements",
            axum::routing::post(submit_reimbursement),
        )
        .route(
            "/rooms/{room_id}/transactions/{transaction_id}/resolve",
            axum::routing::post(resolve_transaction),
        )
        .route(
            "/rooms/{room_id}/transactions/{transaction_id}/payout",
            axum::routing::post(mark_reimbursed),
        )
        .route("/transactions/query", axum::routing::post(query_transactions))
        .route("/funds", axum::routing::post(get_fund_snapshot))
        .route("/rooms/{room_id}/audits", axum::routing::get(get_room_audits))
        .route("/logs", axum::routing::get(get_app_logs))
        .route_layer(middleware::from_fn_with_state(service.clone(), auth_middleware));

    Router::new()
        .route("/login", axum::routing::post(login))
        .route("/users", axum::routing::post(create_user)) // Unprotected
        .merge(protected_routes)
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn login(State(service): State<Service>, Json(req): Json<LoginRequest>) -> Result<Json<LoginResponse>, ApiError> {
    let token = service.authenticate(&req.email, &req.password).await?;
    Ok(Json(LoginResponse { token }))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully"),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn create_user(State(service): State<Service>, Json(req): Json<CreateUserRequest>) -> Result<StatusCode, ApiError> {
    let user = User {
        id: req.id,
        name: req.name,
        email: req.email,
        password: req.password,
    };
    service.add_user(user).await?;
    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(
        ("user_id" = String, Path, description = "ID of the user to retrieve")
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = User),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_user(State(service): State<Service>, Path(user_id): Path<String>) -> Result<Json<User>, ApiError> {
    let user = service
        .get_user(&user_id)
        .await?
        .ok_or_else(|| RoomFundError::UserNotFound(user_id))?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/rooms",
    request_body = CreateRoomRequest,
    responses(
        (status = 200, description = "Room created successfully", body = Room),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn create_room(State(service): State<Service>, Json(req): Json<CreateRoomRequest>) -> Result<Json<Room>, ApiError> {
    let created_by = service
        .get_user(&req.created_by_id)
        .await?
        .ok_or_else(|| RoomFundError::UserNotFound(req.created_by_id))?;
    let room = service.create_room(req.name, &created_by).await?;
    Ok(Json(room))
}

#[utoipa::path(
    get,
    path = "/api/rooms/{room_id}",
    params(
        ("room_id" = String, Path, description = "ID of the room to retrieve")
    ),
    responses(
        (status = 200, description = "Room retrieved successfully", body = Room),
        (status = 404, description = "Room not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_room(State(service): State<Service>, Path(room_id): Path<String>) -> Result<Json<Room>, ApiError> {
    let room = service
        .get_room(&room_id)
        .await?
        .ok_or_else(|| RoomFundError::RoomNotFound(room_id))?;
    Ok(Json(room))
}

#[utoipa::path(
    post,
    path = "/api/rooms/join",
    request_body = JoinRoomRequest,
    responses(
        (status = 200, description = "Joined room; membership pending admin confirmation"),
        (status = 404, description = "User or invite code not found", body = ErrorResponse),
        (status = 409, description = "Already a room member", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn join_room(State(service): State<Service>, Json(req): Json<JoinRoomRequest>) -> Result<StatusCode, ApiError> {
    let user = service
        .get_user(&req.user_id)
        .await?
        .ok_or_else(|| RoomFundError::UserNotFound(req.user_id))?;
    service.join_room(&req.invite_code, &user).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/api/rooms/{room_id}/members/confirm",
    request_body = ConfirmMemberRequest,
    params(
        ("room_id" = String, Path, description = "ID of the room")
    ),
    responses(
        (status = 200, description = "Membership confirmed"),
        (status = 403, description = "Not room admin", body = ErrorResponse),
        (status = 404, description = "Room or user not found", body = ErrorResponse),
        (status = 409, description = "Membership already confirmed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn confirm_member(
    State(service): State<Service>,
    Path(room_id): Path<String>,
    Json(req): Json<ConfirmMemberRequest>,
) -> Result<StatusCode, ApiError> {
    let confirmed_by = service
        .get_user(&req.confirmed_by_id)
        .await?
        .ok_or_else(|| RoomFundError::UserNotFound(req.confirmed_by_id))?;
    service.confirm_member(&room_id, &req.user_id, &confirmed_by).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/api/rooms/{room_id}/members/remove",
    request_body = RemoveMemberRequest,
    params(
        ("room_id" = String, Path, description = "ID of the room")
    ),
    responses(
        (status = 200, description = "Member removed"),
        (status = 403, description = "Not room admin", body = ErrorResponse),
        (status = 404, description = "Room or user not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn remove_member(
    State(service): State<Service>,
    Path(room_id): Path<String>,
    Json(req): Json<RemoveMemberRequest>,
) -> Result<StatusCode, ApiError> {
    let removed_by = service
        .get_user(&req.removed_by_id)
        .await?
        .ok_or_else(|| RoomFundError::UserNotFound(req.removed_by_id))?;
    service.remove_member(&room_id, &req.user_id, &removed_by).await?;
    Ok(StatusCode::OK)
}

#[utoipa::path(
    post,
    path = "/api/rooms/{room_id}/invite_code/regenerate",
    request_body = RegenerateInviteCodeRequest,
    params(
        ("room_id" = String, Path, description = "ID of the room")
    ),
    responses(
        (status = 200, description = "Invite code regenerated", body = String),
        (status = 403, description = "Not room admin", body = ErrorResponse),
        (status = 404, description = "Room or user not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn regenerate_invite_code(
    State(service): State<Service>,
    Path(room_id): Path<String>,
    Json(req): Json<RegenerateInviteCodeRequest>,
) -> Result<Json<String>, ApiError> {
    let regenerated_by = service
        .get_user(&req.regenerated_by_id)
        .await?
        .ok_or_else(|| RoomFundError::UserNotFound(req.regenerated_by_id))?;
    let new_code = service.regenerate_invite_code(&room_id, &regenerated_by).await?;
    Ok(Json(new_code))
}

#[utoipa::path(
    post,
    path = "/api/rooms/{room_id}/contributions",
    request_body = SubmitContributionRequest,
    params(
        ("room_id" = String, Path, description = "ID of the room")
    ),
    responses(
        (status = 200, description = "Contribution submitted, pending admin approval", body = Transaction),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Not a confirmed room member", body = ErrorResponse),
        (status = 404, description = "Room or user not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn submit_contribution(
    State(service): State<Service>,
    Path(room_id): Path<String>,
    Json(req): Json<SubmitContributionRequest>,
) -> Result<Json<Transaction>, ApiError> {
    let submitted_by = service
        .get_user(&req.user_id)
        .await?
        .ok_or_else(|| RoomFundError::UserNotFound(req.user_id))?;
    let transaction = service
        .submit_contribution(&room_id, &submitted_by, req.amount, req.notes)
        .await?;
    Ok(Json(transaction))
}

#[utoipa::path(
    post,
    path = "/api/rooms/{room_id}/reimbursements",
    request_body = SubmitReimbursementRequest,
    params(
        ("room_id" = String, Path, description = "ID of the room")
    ),
    responses(
        (status = 200, description = "Reimbursement requested, pending admin approval", body = Transaction),
        (status = 400, description = "Missing notes or merchant UPI", body = ErrorResponse),
        (status = 403, description = "Not a confirmed room member", body = ErrorResponse),
        (status = 404, description = "Room or user not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn submit_reimbursement(
    State(service): State<Service>,
    Path(room_id): Path<String>,
    Json(req): Json<SubmitReimbursementRequest>,
) -> Result<Json<Transaction>, ApiError> {
    let submitted_by = service
        .get_user(&req.user_id)
        .await?
        .ok_or_else(|| RoomFundError::UserNotFound(req.user_id))?;
    let transaction = service
        .submit_reimbursement(&room_id, &submitted_by, req.amount, req.notes, req.merchant_upi_id)
        .await?;
    Ok(Json(transaction))
}

#[utoipa::path(
    post,
    path = "/api/rooms/{room_id}/transactions/{transaction_id}/resolve",
    request_body = ResolveTransactionRequest,
    params(
        ("room_id" = String, Path, description = "ID of the room"),
        ("transaction_id" = String, Path, description = "ID of the pending transaction")
    ),
    responses(
        (status = 200, description = "Transaction resolved", body = Transaction),
        (status = 403, description = "Not room admin", body = ErrorResponse),
        (status = 404, description = "Room, user or transaction not found", body = ErrorResponse),
        (status = 409, description = "Transaction already resolved", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn resolve_transaction(
    State(service): State<Service>,
    Path((room_id, transaction_id)): Path<(String, String)>,
    Json(req): Json<ResolveTransactionRequest>,
) -> Result<Json<Transaction>, ApiError> {
    let resolved_by = service
        .get_user(&req.resolved_by_id)
        .await?
        .ok_or_else(|| RoomFundError::UserNotFound(req.resolved_by_id))?;
    let transaction = service
        .resolve_transaction(&room_id, &transaction_id, req.decision, &resolved_by)
        .await?;
    Ok(Json(transaction))
}

#[utoipa::path(
    post,
    path = "/api/rooms/{room_id}/transactions/{transaction_id}/payout",
    request_body = PayoutRequest,
    params(
        ("room_id" = String, Path, description = "ID of the room"),
        ("transaction_id" = String, Path, description = "ID of the confirmed reimbursement")
    ),
    responses(
        (status = 200, description = "Reimbursement paid out", body = PayoutResponse),
        (status = 403, description = "Not room admin", body = ErrorResponse),
        (status = 404, description = "Room, user or transaction not found", body = ErrorResponse),
        (status = 409, description = "Not payable in its current state", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn mark_reimbursed(
    State(service): State<Service>,
    Path((room_id, transaction_id)): Path<(String, String)>,
    Json(req): Json<PayoutRequest>,
) -> Result<Json<PayoutResponse>, ApiError> {
    let paid_by = service
        .get_user(&req.paid_by_id)
        .await?
        .ok_or_else(|| RoomFundError::UserNotFound(req.paid_by_id))?;
    let (original, payment) = service
        .mark_reimbursed(&room_id, &transaction_id, &req.member_upi_id, &paid_by)
        .await?;
    Ok(Json(PayoutResponse {
        original_transaction: original,
        reimbursement_payment_transaction: payment,
    }))
}

#[utoipa::path(
    post,
    path = "/api/transactions/query",
    request_body = QueryTransactionsRequest,
    responses(
        (status = 200, description = "Transactions retrieved", body = Vec<Transaction>),
        (status = 403, description = "Not a confirmed room member", body = ErrorResponse),
        (status = 404, description = "Room or user not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn query_transactions(
    State(service): State<Service>,
    Json(req): Json<QueryTransactionsRequest>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let queried_by = service
        .get_user(&req.queried_by_id)
        .await?
        .ok_or_else(|| RoomFundError::UserNotFound(req.queried_by_id))?;
    let transactions = service.list_transactions(&req.room_id, req.status, &queried_by).await?;
    Ok(Json(transactions))
}

#[utoipa::path(
    post,
    path = "/api/funds",
    request_body = GetFundSnapshotRequest,
    responses(
        (status = 200, description = "Fund snapshot retrieved", body = FundSnapshot),
        (status = 403, description = "Not a confirmed room member", body = ErrorResponse),
        (status = 404, description = "Room or user not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_fund_snapshot(
    State(service): State<Service>,
    Json(req): Json<GetFundSnapshotRequest>,
) -> Result<Json<FundSnapshot>, ApiError> {
    let queried_by = service
        .get_user(&req.queried_by_id)
        .await?
        .ok_or_else(|| RoomFundError::UserNotFound(req.queried_by_id))?;
    let snapshot = service.get_fund_snapshot(&req.room_id, &queried_by).await?;
    Ok(Json(snapshot))
}

#[utoipa::path(
    get,
    path = "/api/rooms/{room_id}/audits",
    params(
        ("room_id" = String, Path, description = "ID of the room")
    ),
    responses(
        (status = 200, description = "Room audits retrieved", body = Vec<RoomAudit>),
        (status = 404, description = "Room not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_room_audits(
    State(service): State<Service>,
    Path(room_id): Path<String>,
) -> Result<Json<Vec<RoomAudit>>, ApiError> {
    let audits = service.get_room_audits(&room_id).await?;
    Ok(Json(audits))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "App logs retrieved", body = Vec<AppLog>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("Bearer" = []))
)]
async fn get_app_logs(State(service): State<Service>) -> Result<Json<Vec<AppLog>>, ApiError> {
    let logs = service.get_app_logs().await?;
    Ok(Json(logs))
}
