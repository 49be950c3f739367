use actix_web::dev::Server;
use actix_web::{
    middleware::{Logger, NormalizePath},
    web, App, HttpServer,
};
use sqlx::PgPool;
use std::net::TcpListener;

use crate::configuration::AuthSettings;
use crate::middleware::AuthMiddleware;
use crate::routes::{
    create_job, create_user, delete_job, delete_user, get_job, get_jobs, get_user,
    get_user_info, get_users, health_check, login, update_job, update_user,
};

pub fn run(
    listener: TcpListener,
    connection: PgPool,
    auth_config: AuthSettings,
) -> Result<Server, std::io::Error> {
    let connection = web::Data::new(connection);
    let auth_config_data = web::Data::new(auth_config.clone());

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware. NormalizePath makes "/api/jobs/" and
            // "/api/jobs" the same route.
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())

            // Shared state
            .app_data(connection.clone())
            .app_data(auth_config_data.clone())

            .route("/health_check", web::get().to(health_check))

            // User routes. Only user-info sits behind the gate; the rest are
            // deliberately unauthenticated (see DESIGN.md). user-info and
            // login are registered ahead of the {user_id} matcher.
            .service(
                web::scope("/api/users")
                    .service(
                        web::resource("/user-info")
                            .wrap(AuthMiddleware::new(auth_config.clone()))
                            .route(web::get().to(get_user_info)),
                    )
                    .route("/login", web::post().to(login))
                    .route("", web::get().to(get_users))
                    .route("", web::post().to(create_user))
                    .route("/{user_id}", web::get().to(get_user))
                    .route("/{user_id}", web::patch().to(update_user))
                    .route("/{user_id}", web::delete().to(delete_user)),
            )

            // Job routes: every one requires an authenticated identity.
            .service(
                web::scope("/api/jobs")
                    .wrap(AuthMiddleware::new(auth_config.clone()))
                    .route("", web::get().to(get_jobs))
                    .route("", web::post().to(create_job))
                    .route("/{job_id}", web::get().to(get_job))
                    .route("/{job_id}", web::patch().to(update_job))
                    .route("/{job_id}", web::delete().to(delete_job)),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
