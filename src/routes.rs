use crate::{
    api::{employee, payroll, reports, snapshot},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;

/// Per-IP limiter for the API scope. `None` when the settings make no sense.
pub fn build_limiter(
    requests_per_min: u32,
) -> Option<GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
}

pub fn configure(
    cfg: &mut web::ServiceConfig,
    config: &Config,
    limiter: &GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>,
) {
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(Governor::new(limiter)) // rate limiting
            .configure(api_routes),
    );
}

/// Routes below the API prefix.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dados")
            // /dados
            .service(web::resource("").route(web::get().to(snapshot::get_snapshot)))
            // /dados/refresh
            .service(web::resource("/refresh").route(web::post().to(snapshot::refresh_snapshot))),
    )
    .service(
        web::scope("/employees")
            // /employees
            .service(
                web::resource("")
                    .route(web::get().to(employee::list_employees))
                    .route(web::post().to(employee::save_employee)),
            )
            // /employees/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(employee::get_employee))
                    .route(web::delete().to(employee::delete_employee)),
            ),
    )
    .service(
        web::scope("/payroll-entries")
            // /payroll-entries
            .service(
                web::resource("")
                    .route(web::get().to(payroll::list_entries))
                    .route(web::post().to(payroll::save_entry)),
            )
            .service(web::resource("/draft").route(web::post().to(payroll::draft_entry)))
            .service(web::resource("/recalculate").route(web::post().to(payroll::recalculate)))
            // /payroll-entries/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(payroll::get_entry))
                    .route(web::delete().to(payroll::delete_entry)),
            )
            .service(web::resource("/{id}/finalize").route(web::put().to(payroll::finalize_entry)))
            .service(web::resource("/{id}/reopen").route(web::put().to(payroll::reopen_entry)))
            .service(web::resource("/{id}/receipt").route(web::get().to(payroll::entry_receipt))),
    )
    .service(
        web::scope("/reports")
            .service(web::resource("/dashboard").route(web::get().to(reports::dashboard)))
            .service(web::resource("/export").route(web::get().to(reports::export_csv))),
    );
}
