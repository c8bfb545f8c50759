use crate::api::{
    catalog::CreateCatalogEntry,
    earnings::{Dashboard, MyEarnings, Report, SeamstressDashboard, StaffDashboard, WorkerTotals},
    expenses::{CreateExpense, ExpenseSummary, UpdateExpense},
    incoming_jobs::{
        CreateIncomingJob, CreateOutgoingJob, IncomingJobView, UpdateIncomingJob,
        UpdateOutgoingJob,
    },
    jobs::{CreateJob, CreateJobItem, JobDetail, UpdateJob, UpdateJobItem},
    operations::{CreateOperation, UpdateOperation},
    payroll::{
        DayBreakdown, MonthlyPayroll, PaymentRequest, PayrollDetails, PayrollRow, PayrollSummary,
        StatusCounts,
    },
    revenue::{RevenueReport, RevenueRow, UpdateRates},
    tasks::{CreateTask, MyTasks, TaskStatusUpdate, UpdateTask},
    users::{CreateUser, SeamstressOption, UpdateUser},
};
use crate::api::attendance::CheckIn;
use crate::earnings::{GrowthPoint, JobProfit, PayrollStatus, ProfitSummary, Totals, TrendPoint};
use crate::model::{
    attendance::Attendance,
    catalog::CatalogEntry,
    daily_task::{DailyTask, TaskCounts, TaskStatus},
    expense::Expense,
    incoming_job::IncomingJob,
    job::{Job, JobStatus},
    job_item::{JobItem, JobItemWithTotal},
    operation::Operation,
    outgoing_job::OutgoingJob,
    payroll::PayrollRecord,
    role::Role,
    user::Profile,
};
use crate::models::{LoginReqDto, RegisterReq, TokenPair};
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Atelier API",
        version = "1.0.0",
        description = r#"
## Tailoring workshop management

Backend for a small sewing workshop: jobs and piecework line items, incoming
and outgoing bulk work, attendance, daily tasks, payroll, expenses and revenue.

### Roles
- **ADMIN**: everything, including user management
- **MANAGER**: all workshop operations
- **SEAMSTRESS**: own attendance, tasks and earnings

### Security
Every `/api` endpoint needs `Authorization: Bearer <access token>` from
`/auth/login`. Refresh tokens rotate through `/auth/refresh`.

### Money
Line item value is `quantity * unit_price + bonus_amount`. Admin profit on
incoming work is `(client price - worker cost) * quantity`.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,
        crate::auth::handlers::me,

        crate::api::users::list_users,
        crate::api::users::create_user,
        crate::api::users::update_user,
        crate::api::users::list_seamstresses,

        crate::api::operations::list_operations,
        crate::api::operations::create_operation,
        crate::api::operations::update_operation,
        crate::api::operations::delete_operation,
        crate::api::catalog::list_colors,
        crate::api::catalog::create_color,
        crate::api::catalog::delete_color,
        crate::api::catalog::list_sizes,
        crate::api::catalog::create_size,
        crate::api::catalog::delete_size,

        crate::api::jobs::list_jobs,
        crate::api::jobs::create_job,
        crate::api::jobs::get_job,
        crate::api::jobs::update_job,
        crate::api::jobs::delete_job,
        crate::api::jobs::add_job_item,
        crate::api::jobs::update_job_item,
        crate::api::jobs::delete_job_item,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::list_attendance,
        crate::api::attendance::today,

        crate::api::tasks::list_tasks,
        crate::api::tasks::create_task,
        crate::api::tasks::update_task,
        crate::api::tasks::delete_task,
        crate::api::tasks::my_tasks,
        crate::api::tasks::update_task_status,

        crate::api::incoming_jobs::list_incoming,
        crate::api::incoming_jobs::create_incoming,
        crate::api::incoming_jobs::get_incoming,
        crate::api::incoming_jobs::update_incoming,
        crate::api::incoming_jobs::delete_incoming,
        crate::api::incoming_jobs::list_outgoing,
        crate::api::incoming_jobs::create_outgoing,
        crate::api::incoming_jobs::update_outgoing,
        crate::api::incoming_jobs::delete_outgoing,

        crate::api::revenue::get_revenue,
        crate::api::revenue::update_rates,

        crate::api::expenses::list_expenses,
        crate::api::expenses::create_expense,
        crate::api::expenses::update_expense,
        crate::api::expenses::delete_expense,
        crate::api::expenses::expense_summary,

        crate::api::earnings::my_earnings,
        crate::api::earnings::reports,
        crate::api::earnings::dashboard,

        crate::api::payroll::monthly,
        crate::api::payroll::daily,
        crate::api::payroll::growth,
        crate::api::payroll::trend,
        crate::api::payroll::details,
        crate::api::payroll::record_payment,
        crate::api::payroll::export_csv
    ),
    components(
        schemas(
            RegisterReq,
            LoginReqDto,
            TokenPair,
            Role,
            Profile,
            CreateUser,
            UpdateUser,
            SeamstressOption,
            Operation,
            CreateOperation,
            UpdateOperation,
            CatalogEntry,
            CreateCatalogEntry,
            Job,
            JobStatus,
            CreateJob,
            UpdateJob,
            JobDetail,
            JobItem,
            JobItemWithTotal,
            CreateJobItem,
            UpdateJobItem,
            Totals,
            Attendance,
            CheckIn,
            DailyTask,
            TaskStatus,
            TaskCounts,
            CreateTask,
            UpdateTask,
            TaskStatusUpdate,
            MyTasks,
            IncomingJob,
            IncomingJobView,
            CreateIncomingJob,
            UpdateIncomingJob,
            OutgoingJob,
            CreateOutgoingJob,
            UpdateOutgoingJob,
            JobProfit,
            ProfitSummary,
            RevenueRow,
            RevenueReport,
            UpdateRates,
            Expense,
            CreateExpense,
            UpdateExpense,
            ExpenseSummary,
            WorkerTotals,
            MyEarnings,
            Report,
            Dashboard,
            SeamstressDashboard,
            StaffDashboard,
            PayrollRecord,
            PayrollStatus,
            PayrollRow,
            PayrollSummary,
            StatusCounts,
            MonthlyPayroll,
            DayBreakdown,
            GrowthPoint,
            TrendPoint,
            PayrollDetails,
            PaymentRequest
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and token rotation"),
        (name = "Users", description = "Account management"),
        (name = "Catalog", description = "Operations, colors and sizes"),
        (name = "Jobs", description = "Jobs and their piecework line items"),
        (name = "Attendance", description = "Daily check-in and check-out"),
        (name = "Tasks", description = "Daily tasks for seamstresses"),
        (name = "Incoming/Outgoing", description = "Bulk work received and shipped back"),
        (name = "Revenue", description = "Per-job margins and admin profit"),
        (name = "Expenses", description = "Workshop expenses and net profit"),
        (name = "Earnings", description = "Earnings, reports and dashboard"),
        (name = "Payroll", description = "Monthly payroll, payments and export"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_payroll_export_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/payroll/export"));
        assert!(doc.paths.paths.contains_key("/auth/login"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
