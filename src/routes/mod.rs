use actix_web::web;

pub mod backend_health;
pub mod club;
pub mod partidos;
pub mod ranking;

use crate::middleware::auth::AuthMiddleware;
use crate::middleware::club_admin::ClubAdminMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health);

    // Player routes (require authentication)
    cfg.service(
        web::scope("/partidos")
            .wrap(AuthMiddleware)
            .service(partidos::create_match)
            .service(partidos::list_open_matches)
            .service(partidos::list_my_matches)
            .service(partidos::get_match)
            .service(partidos::join_match)
            .service(partidos::leave_match)
            .service(partidos::cancel_match),
    );
    cfg.service(
        web::scope("/clubes")
            .wrap(AuthMiddleware)
            .service(partidos::get_club_grid),
    );
    cfg.service(
        web::scope("/parejas")
            .wrap(AuthMiddleware)
            .service(ranking::create_pair)
            .service(ranking::record_pair_result)
            .service(ranking::deactivate_pair),
    );
    cfg.service(
        web::scope("/ranking")
            .wrap(AuthMiddleware)
            .service(ranking::get_ranking),
    );

    // Club back-office routes (club staff only)
    cfg.service(
        web::scope("/club")
            .wrap(ClubAdminMiddleware)
            .service(club::create_manual_reservation)
            .service(club::get_club_settings)
            .service(club::save_club_settings)
            .service(club::get_own_club_grid),
    );
}
