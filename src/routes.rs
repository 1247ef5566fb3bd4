use crate::{
    api::{attendance, employee},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    errors::ApiError,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{
    middleware::{Condition, from_fn},
    web,
};
use anyhow::{Result, anyhow};

type LimiterConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-route rate limiter settings, built once at startup.
#[derive(Clone)]
pub struct RateLimits {
    enabled: bool,
    login: LimiterConfig,
    register: LimiterConfig,
    protected: LimiterConfig,
}

impl RateLimits {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            enabled: config.rate_limit_enabled,
            login: build_limiter(config.rate_login_per_min)?,
            register: build_limiter(config.rate_register_per_min)?,
            protected: build_limiter(config.rate_protected_per_min)?,
        })
    }
}

// Replenishes one request every 60_000 / n ms with a burst of n.
fn build_limiter(requests_per_min: u32) -> Result<LimiterConfig> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = 60_000 / requests_per_min as u64;

    GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms.max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit: {requests_per_min} requests/min"))
}

/// Malformed JSON, query strings and path segments all answer with the `{"error": ..}` envelope.
fn extractor_configs(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::bad_request(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::bad_request(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ApiError::bad_request(err.to_string()).into()),
    );
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limits: &RateLimits) {
    extractor_configs(cfg);

    let limited = |c: &LimiterConfig| Condition::new(limits.enabled, Governor::new(c));

    cfg.service(
        web::scope(&config.api_prefix)
            // Public routes
            .service(
                web::resource("/login")
                    .wrap(limited(&limits.login))
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(limited(&limits.register))
                    .route(web::post().to(handlers::register)),
            )
            // Employees: create is open, the rest check the caller in the handler
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /employees/search, ahead of /{id}
                    .service(
                        web::resource("/search").route(web::get().to(employee::search_employees)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            )
            // Attendance: token required for every route
            .service(
                web::scope("/attendance")
                    .wrap(from_fn(auth_middleware))
                    .wrap(limited(&limits.protected))
                    .service(
                        web::resource("/clock-in/{id}").route(web::post().to(attendance::clock_in)),
                    )
                    .service(
                        web::resource("/clock-out/{id}")
                            .route(web::post().to(attendance::clock_out)),
                    )
                    .service(
                        web::resource("/work-hours/{id}")
                            .route(web::get().to(attendance::work_hours)),
                    ),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_is_clamped_instead_of_failing() {
        assert!(build_limiter(0).is_ok());
        assert!(build_limiter(1000).is_ok());
        assert!(build_limiter(120_000).is_ok());
    }
}
