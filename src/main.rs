#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

#[macro_use]
mod helpers;
mod http_api;
mod user_api;
mod public_files;

pub use helpers::*;

pub use pencil::{Request, PencilResult};

use pencil::Pencil;
use tarjeta_backend::db;

pub fn main() {
    pretty_env_logger::init();
    info!("Starting.");
    check_env_vars();
    let conn = db::db_connect(&*DATABASE_URL).expect("Can't connect to database!");
    if !db::check_db(&conn).expect("Something funny with the DB!") {
        warn!("There are no users yet. Sign up through the front page or with the user tool.");
    }
    info!("Database OK.");

    let mut app = Pencil::new(".");

    app.httperrorhandler(401, unauthorized);
    app.httperrorhandler(404, not_found);
    app.httperrorhandler(500, internal_server_error);

    // CARDS
    app.get("/api/card", "get_cards", http_api::get_cards);
    app.post("/api/card", "add_card", http_api::add_card);
    app.put("/api/card/<id:int>", "update_card", http_api::update_card);
    app.post("/api/card/resetAll", "reset_all", http_api::reset_all);
    app.get("/api/card/getArticle", "get_article", http_api::get_article);
    app.get("/api/card/getTranslationSuggestions",
            "get_translation_suggestions",
            http_api::get_translation_suggestions);

    // TRAINING
    app.get("/api/training", "get_training", http_api::get_training);
    app.post("/api/training/cardLevelup", "card_levelup", http_api::card_levelup);
    app.post("/api/training/cardLeveldown", "card_leveldown", http_api::card_leveldown);

    // EXERCISES
    app.get("/api/number", "get_number", http_api::get_number);
    app.post("/api/writing", "post_writing", http_api::post_writing);
    app.get("/api/writing/getConfig", "get_writing_config", http_api::get_writing_config);

    // USERS
    app.post("/api/user", "create_user", user_api::create_user);
    app.post("/api/user/login", "login", user_api::login);
    app.get("/api/user/logout", "logout", user_api::logout);
    app.get("/api/user/current", "current_user", user_api::current_user);

    // FRONT-END
    app.get("/", "index", public_files::index);
    app.get("/<filename:string>", "root_file", public_files::root_file);
    app.get("/js/<filename:string>", "js_file", public_files::js_file);
    app.get("/css/<filename:string>", "css_file", public_files::css_file);

    info!("Ready. Running on {}, serving {:?}", *SERVER_BINDING, &*PUBLIC_DIR);
    app.run(*SERVER_BINDING);
}
