use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use actix_web_csp_nonce::{configure_csp, CspConfig, CspMiddleware, CspStats};

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <style nonce="{nonce}">body { font-family: sans-serif; }</style>
</head>
<body>
    <h1>CSP nonce demo</h1>
    <script nonce="{nonce}">console.log('allowed by nonce');</script>
    <script>console.log('blocked: no nonce');</script>
</body>
</html>"#;

async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(PAGE)
}

async fn api() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok", "nonce": "{nonce}" }))
}

async fn stats(config: web::Data<CspConfig>) -> HttpResponse {
    let stats: &CspStats = config.stats();
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(stats.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        args.push("default-src 'self'; script-src {nonce}; style-src {nonce}".to_owned());
    }

    let config = CspConfig::from_args(&args)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;
    let csp = CspMiddleware::new(config);

    log::info!("serving on http://127.0.0.1:8080 with {:?}", csp.config());

    HttpServer::new(move || {
        App::new()
            .wrap(csp.clone())
            .wrap(Logger::default())
            .configure(configure_csp(&csp))
            .route("/", web::get().to(index))
            .route("/api", web::get().to(api))
            .route("/stats", web::get().to(stats))
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}
