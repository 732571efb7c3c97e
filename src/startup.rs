use actix_cors::Cors;
use actix_files as fs;
use actix_web::dev::Server;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use sqlx::PgPool;
use std::net::TcpListener;

use crate::configuration::{CorsSettings, Settings};
use crate::error::{AppError, ValidationError};
use crate::logger::RequestLogger;
use crate::middleware::JwtMiddleware;
use crate::routes::{
    create_board, create_task, delete_board, delete_task, get_board, health_check, list_boards,
    login, refresh, signup, update_board, update_task, validate,
};

fn cors(settings: &CorsSettings) -> Cors {
    settings.allowed_origins.iter().fold(
        Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
            .supports_credentials()
            .max_age(3600),
        |cors, origin| cors.allowed_origin(origin),
    )
}

/// Malformed JSON bodies become our 400 error body
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(ValidationError::MalformedBody(err.to_string())).into()
    })
}

/// A path id that is not a UUID cannot name an owned resource
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|_err, _req| AppError::NotFound("Resource").into())
}

pub fn run(listener: TcpListener, connection: PgPool, settings: Settings) -> Result<Server, std::io::Error> {
    let connection = web::Data::new(connection);
    let jwt_config = settings.jwt.clone();
    let jwt_config_data = web::Data::new(settings.jwt.clone());
    let cors_settings = settings.cors.clone();
    let static_dir = settings.application.static_dir.clone();

    let server = HttpServer::new(move || {
        let app = App::new()
            // Global middleware; the last one wrapped runs first
            .wrap(RequestLogger)
            .wrap(Logger::default())
            .wrap(cors(&cors_settings))

            // Shared state
            .app_data(json_config())
            .app_data(path_config())
            .app_data(connection.clone())
            .app_data(jwt_config_data.clone())

            .route("/health_check", web::get().to(health_check))

            // Session endpoints; only validate needs an access token
            .service(
                web::scope("/api/auth")
                    .route("/signup", web::post().to(signup))
                    .route("/login", web::post().to(login))
                    .route("/refresh", web::post().to(refresh))
                    .service(
                        web::resource("/validate")
                            .wrap(JwtMiddleware::new(jwt_config.clone()))
                            .route(web::get().to(validate)),
                    ),
            )

            // Protected resources
            .service(
                web::scope("/api")
                    .wrap(JwtMiddleware::new(jwt_config.clone()))
                    .route("/boards", web::get().to(list_boards))
                    .route("/boards", web::post().to(create_board))
                    .route("/boards/{board_id}", web::get().to(get_board))
                    .route("/boards/{board_id}", web::put().to(update_board))
                    .route("/boards/{board_id}", web::delete().to(delete_board))
                    .route("/boards/{board_id}/tasks", web::post().to(create_task))
                    .route("/tasks/{task_id}", web::put().to(update_task))
                    .route("/tasks/{task_id}", web::delete().to(delete_task)),
            );

        // Client bundle last so it never shadows API routes
        match &static_dir {
            Some(dir) => app.service(fs::Files::new("/", dir).index_file("index.html")),
            None => app,
        }
    })
    .listen(listener)?
    .run();

    Ok(server)
}
