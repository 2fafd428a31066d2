// src/web/routes.rs
use crate::{
    state::AppState,
    web::{
        asistencia_handlers, auth_handlers, catalogo_handlers, entrenamiento_handlers, jugador_handlers, mw_auth,
        mw_gestor, partido_handlers, usuario_handlers,
    },
};
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    // --- Rutas públicas ---
    let public_routes = Router::new()
        .route("/auth/registro", post(auth_handlers::registro))
        .route("/auth/login", post(auth_handlers::login))
        .route("/auth/logout", post(auth_handlers::logout))
        .route("/posiciones", get(catalogo_handlers::posiciones))
        .route("/motivos-ausencia", get(catalogo_handlers::motivos_ausencia));

    // --- Rutas de gestor ---
    // Solo el middleware de rol; require_auth lo aplica el router padre
    let gestor_routes = Router::new()
        .route("/usuarios", get(usuario_handlers::listar))
        .route("/usuarios/{id}/activo", put(usuario_handlers::cambiar_activo))
        .route("/jugadores", post(jugador_handlers::crear))
        .route("/jugadores/{id}", delete(jugador_handlers::eliminar))
        .route("/jugadores/{id}/dorsal", put(jugador_handlers::asignar_dorsal))
        .route("/jugadores/{id}/posicion", put(jugador_handlers::cambiar_posicion))
        .route("/jugadores/{id}/usuario", put(jugador_handlers::vincular_usuario))
        .route("/partidos", post(partido_handlers::crear))
        .route(
            "/partidos/{id}",
            put(partido_handlers::actualizar).delete(partido_handlers::eliminar),
        )
        .route("/partidos/{id}/resultado", put(partido_handlers::registrar_resultado))
        .route("/entrenamientos", post(entrenamiento_handlers::crear))
        .route(
            "/entrenamientos/{id}",
            put(entrenamiento_handlers::actualizar).delete(entrenamiento_handlers::eliminar),
        )
        .route_layer(middleware::from_fn(mw_gestor::require_gestor));

    // --- Rutas autenticadas ---
    let authenticated_routes = Router::new()
        .route("/auth/perfil", get(auth_handlers::perfil).put(auth_handlers::actualizar_perfil))
        .route("/auth/password", put(auth_handlers::cambiar_password))
        .route("/jugadores", get(jugador_handlers::listar))
        .route("/jugadores/{id}", get(jugador_handlers::obtener))
        .route("/jugadores/usuario/{usuario_id}", get(jugador_handlers::obtener_por_usuario))
        .route("/jugadores/{id}/contacto", put(jugador_handlers::actualizar_contacto))
        .route("/jugadores/{id}/datos", put(jugador_handlers::actualizar_datos_personales))
        .route("/posiciones/{id}/jugadores", get(jugador_handlers::listar_por_posicion))
        .route("/partidos", get(partido_handlers::listar))
        .route("/partidos/proximos", get(partido_handlers::proximos))
        .route("/partidos/rango", get(partido_handlers::por_rango))
        .route("/partidos/{id}", get(partido_handlers::obtener))
        .route("/entrenamientos", get(entrenamiento_handlers::listar))
        .route("/entrenamientos/proximos", get(entrenamiento_handlers::proximos))
        .route("/entrenamientos/rango", get(entrenamiento_handlers::por_rango))
        .route("/entrenamientos/{id}", get(entrenamiento_handlers::obtener))
        .route("/asistencias", post(asistencia_handlers::registrar))
        .route(
            "/asistencias/{id}",
            put(asistencia_handlers::actualizar_estado).delete(asistencia_handlers::eliminar),
        )
        .route("/asistencias/evento", get(asistencia_handlers::por_evento))
        .route("/asistencias/evento/agrupadas", get(asistencia_handlers::agrupadas))
        .route("/asistencias/evento/resumen", get(asistencia_handlers::resumen))
        .route("/asistencias/jugadores/{id}/estadisticas", get(asistencia_handlers::estadisticas))
        .route("/asistencias/jugadores/{id}/comparativas", get(asistencia_handlers::comparativas))
        .route("/asistencias/jugadores/{id}/historial", get(asistencia_handlers::historial))
        // Mismas rutas, otros métodos: se fusionan con las de arriba
        .merge(gestor_routes)
        .route_layer(middleware::from_fn(mw_auth::require_auth));

    let api = Router::new().merge(public_routes).merge(authenticated_routes);

    Router::new().nest("/api", api).with_state(app_state)
}
