use utoipa::OpenApi;

use crate::{
    api::models::{
        ConfirmMemberRequest, CreateRoomRequest, CreateUserRequest, ErrorResponse, GetFundSnapshotRequest,
        JoinRoomRequest, LoginRequest, LoginResponse, PayoutRequest, PayoutResponse, QueryTransactionsRequest,
        RegenerateInviteCodeRequest, RemoveMemberRequest, ResolveTransactionRequest, SubmitContributionRequest,
        SubmitReimbursementRequest,
    },
    core::models::{
        audit::{AppLog, RoomAudit},
        fund::FundSnapshot,
        room::Room,
        transaction::Transaction,
        user::User,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::login,
        super::handlers::create_user,
        super::handlers::get_user,
        super::handlers::create_room,
        super::handlers::get_room,
        super::handlers::join_room,
        super::handlers::confirm_member,
        super::handlers::remove_member,
        super::handlers::regenerate_invite_code,
        super::handlers::submit_contribution,
        super::handlers::submit_reimbursement,
        super::handlers::resolve_transaction,
        super::handlers::mark_reimbursed,
        super::handlers::query_transactions,
        super::handlers::get_fund_snapshot,
        super::handlers::get_room_audits,
        super::handlers::get_app_logs
    ),
    components(schemas(
        LoginRequest,
        LoginResponse,
        CreateUserRequest,
        CreateRoomRequest,
        JoinRoomRequest,
        ConfirmMemberRequest,
        RemoveMemberRequest,
        RegenerateInviteCodeRequest,
        SubmitContributionRequest,
        SubmitReimbursementRequest,
        ResolveTransactionRequest,
        PayoutRequest,
        PayoutResponse,
        QueryTransactionsRequest,
        GetFundSnapshotRequest,
        ErrorResponse,
        User,
        Room,
        Transaction,
        FundSnapshot,
        AppLog,
        RoomAudit
    )),
    info(
        title = "RoomFund API",
        description = "API for room-based shared funds: UPI contributions, reimbursements and admin approvals",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
