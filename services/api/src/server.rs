use crate::cli::ServeArgs;
use crate::infra::{
    sample_company, sample_job, AppState, InMemoryAssessmentRepository, InMemoryCompanyDirectory,
    InMemoryJobDirectory, InMemorySubmissionRepository,
};
use crate::routes::with_workflow_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use talentgate::config::{AppConfig, AppEnvironment};
use talentgate::error::AppError;
use talentgate::telemetry;
use talentgate::workflows::assessment::submissions::SubmissionService;
use talentgate::workflows::assessment::{AssessmentService, HttpAssessmentGenerator};
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let assessments = Arc::new(InMemoryAssessmentRepository::default());
    let submissions = Arc::new(InMemorySubmissionRepository::default());
    let jobs = Arc::new(InMemoryJobDirectory::default());
    let companies = Arc::new(InMemoryCompanyDirectory::default());
    let generator = Arc::new(HttpAssessmentGenerator::from_config(&config.generator)?);

    if config.environment == AppEnvironment::Development {
        let company = sample_company();
        let job = sample_job();
        info!(
            company_id = %company.id.0,
            job_id = %job.id.0,
            "seeded development directory records"
        );
        companies.register(company);
        jobs.register(job);
    }

    let authoring = Arc::new(AssessmentService::new(
        assessments.clone(),
        jobs.clone(),
        companies,
        generator,
    ));
    let review = Arc::new(SubmissionService::new(submissions, assessments, jobs));

    let app = with_workflow_routes(authoring, review)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "talentgate assessment platform ready");

    axum::serve(listener, app).await?;
    Ok(())
}
