use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use pollsapi::auth::rate_limit::RateLimiter;
use pollsapi::db;
use pollsapi::handlers::{
    auth_handlers, choice_handlers, poll_handlers, snippet_handlers, user_handlers, vote_handlers,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/app.db?mode=rwc".to_string());

    // Ensure the default data directory exists before SQLite opens the file
    if database_url.starts_with("sqlite://data/") {
        std::fs::create_dir_all("data").expect("Failed to create data directory");
    }

    let pool = db::init_pool(&database_url)
        .await
        .expect("Failed to create DB pool");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    // Session encryption key — load from SESSION_KEY env var for persistent sessions across restarts
    let secret_key = match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!(
                "SESSION_KEY too short ({} bytes, need 64+) — generating random key",
                val.len()
            );
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set — generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let limiter = RateLimiter::new();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw =
            SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                .cookie_secure(false)
                .cookie_http_only(true)
                .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(limiter.clone()))
            .service(
                web::scope("/api-polls")
                    .service(
                        web::resource("/user/").route(web::post().to(auth_handlers::register)),
                    )
                    .service(web::resource("/login/").route(web::post().to(auth_handlers::login)))
                    .service(
                        web::resource("/logout/").route(web::post().to(auth_handlers::logout)),
                    )
                    .service(
                        web::resource("/poll/")
                            .route(web::get().to(poll_handlers::list))
                            .route(web::post().to(poll_handlers::create)),
                    )
                    .service(
                        web::resource("/poll/{pk}/")
                            .route(web::get().to(poll_handlers::retrieve))
                            .route(web::put().to(poll_handlers::update))
                            .route(web::delete().to(poll_handlers::destroy)),
                    )
                    .service(
                        web::resource("/poll/{pk}/choice/")
                            .route(web::get().to(choice_handlers::list))
                            .route(web::post().to(choice_handlers::create)),
                    )
                    .service(
                        web::resource("/poll/{pk}/choice/{choice_pk}/")
                            .route(web::get().to(choice_handlers::retrieve))
                            .route(web::put().to(choice_handlers::update))
                            .route(web::delete().to(choice_handlers::destroy)),
                    )
                    // Raw {pk}/{choice_pk} strings: the admission check owns
                    // their coercion. Unmatched verbs answer 405 here.
                    .service(
                        web::resource("/poll/{pk}/choice/{choice_pk}/vote/")
                            .route(web::post().to(vote_handlers::create)),
                    ),
            )
            .service(
                web::scope("/api-snippets")
                    .service(
                        web::resource("/snippets/")
                            .route(web::get().to(snippet_handlers::list))
                            .route(web::post().to(snippet_handlers::create)),
                    )
                    .service(
                        web::resource("/snippets/{pk}/")
                            .route(web::get().to(snippet_handlers::retrieve))
                            .route(web::put().to(snippet_handlers::update))
                            .route(web::delete().to(snippet_handlers::destroy)),
                    )
                    .service(
                        web::resource("/snippets/{pk}/highlight/")
                            .route(web::get().to(snippet_handlers::highlighted)),
                    )
                    .service(web::resource("/users/").route(web::get().to(user_handlers::list)))
                    .service(
                        web::resource("/users/{pk}/").route(web::get().to(user_handlers::retrieve)),
                    ),
            )
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound()
                    .json(serde_json::json!({"detail": "Not found."}))
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
