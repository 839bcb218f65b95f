use crate::models::User;
use async_trait::async_trait;
use front_controller::{Action, AppError, Arity, Context, Controller};
use serde_json::{json, Map, Value};

pub struct HomeController;

const ACTIONS: &[Action] = &[Action::new("index", Arity::NONE)];

#[async_trait]
impl Controller for HomeController {
    fn actions(&self) -> &'static [Action] {
        ACTIONS
    }

    async fn invoke(
        &mut self,
        action: &str,
        _params: Vec<String>,
        cx: &mut Context<'_>,
    ) -> Result<(), AppError> {
        match action {
            "index" => self.index(cx).await,
            other => Err(AppError::InvalidArgument(format!("unknown action {}", other))),
        }
    }
}

impl HomeController {
    async fn index(&self, cx: &mut Context<'_>) -> Result<(), AppError> {
        let user = cx.model::<User>().first().await?;
        let field = |key: &str| {
            user.as_ref()
                .and_then(|u| u.get(key))
                .cloned()
                .unwrap_or(Value::Null)
        };
        let mut data = Map::new();
        data.insert("title".into(), json!("Home"));
        data.insert("id".into(), field("id"));
        data.insert("name".into(), field("name"));
        data.insert("status".into(), json!(cx.take_flash("status")));
        cx.view("home/index", &data).await
    }
}
