use crate::{
    api::{
        attendance, catalog, earnings, expenses, incoming_jobs, jobs, operations, payroll,
        revenue, tasks, users,
    },
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

/// Per-peer-IP limiter allowing `requests_per_min`, with the same burst.
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        // both values are non-zero
        .expect("valid governor config");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes. Fixed segments are registered before `/{id}` siblings.
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .route("/me", web::get().to(handlers::me))
            .service(
                web::scope("/users")
                    .service(
                        web::resource("")
                            .route(web::get().to(users::list_users))
                            .route(web::post().to(users::create_user)),
                    )
                    .service(
                        web::resource("/seamstresses")
                            .route(web::get().to(users::list_seamstresses)),
                    )
                    .service(web::resource("/{id}").route(web::put().to(users::update_user))),
            )
            .service(
                web::scope("/operations")
                    .service(
                        web::resource("")
                            .route(web::get().to(operations::list_operations))
                            .route(web::post().to(operations::create_operation)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(operations::update_operation))
                            .route(web::delete().to(operations::delete_operation)),
                    ),
            )
            .service(
                web::scope("/colors")
                    .service(
                        web::resource("")
                            .route(web::get().to(catalog::list_colors))
                            .route(web::post().to(catalog::create_color)),
                    )
                    .service(web::resource("/{id}").route(web::delete().to(catalog::delete_color))),
            )
            .service(
                web::scope("/sizes")
                    .service(
                        web::resource("")
                            .route(web::get().to(catalog::list_sizes))
                            .route(web::post().to(catalog::create_size)),
                    )
                    .service(web::resource("/{id}").route(web::delete().to(catalog::delete_size))),
            )
            .service(
                web::scope("/jobs")
                    .service(
                        web::resource("")
                            .route(web::get().to(jobs::list_jobs))
                            .route(web::post().to(jobs::create_job)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(jobs::get_job))
                            .route(web::put().to(jobs::update_job))
                            .route(web::delete().to(jobs::delete_job)),
                    )
                    .service(
                        web::resource("/{id}/items").route(web::post().to(jobs::add_job_item)),
                    ),
            )
            .service(
                web::resource("/job-items/{id}")
                    .route(web::put().to(jobs::update_job_item))
                    .route(web::delete().to(jobs::delete_job_item)),
            )
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("").route(web::get().to(attendance::list_attendance)),
                    )
                    .service(
                        web::resource("/check-in").route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/check-out").route(web::put().to(attendance::check_out)),
                    )
                    .service(web::resource("/today").route(web::get().to(attendance::today))),
            )
            .service(
                web::scope("/tasks")
                    .service(
                        web::resource("")
                            .route(web::get().to(tasks::list_tasks))
                            .route(web::post().to(tasks::create_task)),
                    )
                    .service(web::resource("/mine").route(web::get().to(tasks::my_tasks)))
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(tasks::update_task))
                            .route(web::delete().to(tasks::delete_task)),
                    )
                    .service(
                        web::resource("/{id}/status")
                            .route(web::put().to(tasks::update_task_status)),
                    ),
            )
            .service(
                web::scope("/incoming-jobs")
                    .service(
                        web::resource("")
                            .route(web::get().to(incoming_jobs::list_incoming))
                            .route(web::post().to(incoming_jobs::create_incoming)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(incoming_jobs::get_incoming))
                            .route(web::put().to(incoming_jobs::update_incoming))
                            .route(web::delete().to(incoming_jobs::delete_incoming)),
                    )
                    .service(
                        web::resource("/{id}/outgoing")
                            .route(web::get().to(incoming_jobs::list_outgoing))
                            .route(web::post().to(incoming_jobs::create_outgoing)),
                    ),
            )
            .service(
                web::resource("/outgoing-jobs/{id}")
                    .route(web::put().to(incoming_jobs::update_outgoing))
                    .route(web::delete().to(incoming_jobs::delete_outgoing)),
            )
            .service(
                web::scope("/revenue")
                    .service(web::resource("").route(web::get().to(revenue::get_revenue)))
                    .service(
                        web::resource("/{id}/rates").route(web::put().to(revenue::update_rates)),
                    ),
            )
            .service(
                web::scope("/expenses")
                    .service(
                        web::resource("")
                            .route(web::get().to(expenses::list_expenses))
                            .route(web::post().to(expenses::create_expense)),
                    )
                    .service(
                        web::resource("/summary").route(web::get().to(expenses::expense_summary)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(expenses::update_expense))
                            .route(web::delete().to(expenses::delete_expense)),
                    ),
            )
            .route("/earnings/me", web::get().to(earnings::my_earnings))
            .route("/reports", web::get().to(earnings::reports))
            .route("/dashboard", web::get().to(earnings::dashboard))
            .service(
                web::scope("/payroll")
                    .route("/monthly", web::get().to(payroll::monthly))
                    .route("/daily", web::get().to(payroll::daily))
                    .route("/growth", web::get().to(payroll::growth))
                    .route("/trend", web::get().to(payroll::trend))
                    .route("/details", web::get().to(payroll::details))
                    .route("/payments", web::post().to(payroll::record_payment))
                    .route("/export", web::get().to(payroll::export_csv)),
            ),
    );
}

// LOGIN
//  ├─ access_token (ACCESS_TOKEN_TTL)
//  └─ refresh_token (REFRESH_TOKEN_TTL, stored in refresh_tokens)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /auth/refresh with refresh_token
//       └─ revokes it, returns a new pair
