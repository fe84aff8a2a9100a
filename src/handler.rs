// HTTP handler bindings for the move service endpoints
//
// This module provides thin wrapper functions that bind Rocket HTTP routes
// to the Bot's core logic methods. Handlers are responsible for:
// - Deserializing incoming JSON requests
// - Extracting Bot instance from Rocket's managed state
// - Delegating to Bot methods
// - Serializing responses

use rocket::http::Status;
use rocket::response::status::BadRequest;
use rocket::serde::json::Json;
use serde_json::Value;

use deep_box::bot::Bot;
use deep_box::types::{GameRequest, MoveRequest};

/// GET / endpoint
/// Returns player metadata
#[get("/")]
pub fn index(bot: &rocket::State<Bot>) -> Json<Value> {
    Json(bot.info())
}

/// POST /start endpoint
/// Called when a game starts
#[post("/start", format = "json", data = "<start_req>")]
pub fn start(bot: &rocket::State<Bot>, start_req: Json<GameRequest>) -> Status {
    bot.start(&start_req);

    Status::Ok
}

/// POST /move endpoint
/// Called each turn to compute and return the next edge
#[post("/move", format = "json", data = "<move_req>")]
pub async fn get_move(
    bot: &rocket::State<Bot>,
    move_req: Json<MoveRequest>,
) -> Result<Json<Value>, BadRequest<String>> {
    bot.get_move(&move_req).await.map(Json).map_err(BadRequest)
}

/// POST /end endpoint
/// Called when a game ends
#[post("/end", format = "json", data = "<end_req>")]
pub fn end(bot: &rocket::State<Bot>, end_req: Json<GameRequest>) -> Status {
    bot.end(&end_req);

    Status::Ok
}
