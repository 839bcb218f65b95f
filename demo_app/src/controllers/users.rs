use crate::models::User;
use async_trait::async_trait;
use axum::http::StatusCode;
use front_controller::{Action, AppError, Arity, Context, Controller};
use serde_json::json;

const PER_PAGE: i64 = 20;

pub struct UsersController;

const ACTIONS: &[Action] = &[
    Action::new("index", Arity::NONE),
    Action::new("show", Arity::exact(1)),
    Action::new("store", Arity::NONE),
    Action::new("destroy", Arity::exact(1)),
];

#[async_trait]
impl Controller for UsersController {
    fn actions(&self) -> &'static [Action] {
        ACTIONS
    }

    async fn invoke(
        &mut self,
        action: &str,
        params: Vec<String>,
        cx: &mut Context<'_>,
    ) -> Result<(), AppError> {
        let id = params.first().map(String::as_str).unwrap_or_default();
        match action {
            "index" => self.index(cx).await,
            "show" => self.show(cx, id).await,
            "store" => self.store(cx).await,
            "destroy" => self.destroy(cx, id).await,
            other => Err(AppError::InvalidArgument(format!("unknown action {}", other))),
        }
    }
}

impl UsersController {
    async fn index(&self, cx: &mut Context<'_>) -> Result<(), AppError> {
        let page = cx.input_or("page", "1").parse::<i64>().unwrap_or(1).max(1);
        let users = cx.model::<User>().page(page, PER_PAGE).await?;
        cx.json(&json!({ "page": page, "data": users }), StatusCode::OK)
    }

    async fn show(&self, cx: &mut Context<'_>, id: &str) -> Result<(), AppError> {
        match cx.model::<User>().find(id).await? {
            Some(user) => cx.json(&user, StatusCode::OK),
            None => cx.json(&json!({ "error": "User not found" }), StatusCode::NOT_FOUND),
        }
    }

    async fn store(&self, cx: &mut Context<'_>) -> Result<(), AppError> {
        if !cx.is_post() {
            return cx.json(&json!({ "error": "POST required" }), StatusCode::METHOD_NOT_ALLOWED);
        }
        let name = cx.input_or("name", "").trim();
        let email = cx.input_or("email", "").trim();
        if name.is_empty() || email.is_empty() {
            return cx.json(
                &json!({ "error": "name and email are required" }),
                StatusCode::UNPROCESSABLE_ENTITY,
            );
        }
        let id = cx.model::<User>().create(name, email).await?;
        tracing::info!(user_id = %id, "user created");
        cx.flash("status", "User created.");
        cx.redirect(&format!("users/show/{}", id))
    }

    async fn destroy(&self, cx: &mut Context<'_>, id: &str) -> Result<(), AppError> {
        if !cx.is_post() {
            return cx.json(&json!({ "error": "POST required" }), StatusCode::METHOD_NOT_ALLOWED);
        }
        let deleted = cx.model::<User>().delete(id).await?;
        cx.json(&json!({ "deleted": deleted }), StatusCode::OK)
    }
}
