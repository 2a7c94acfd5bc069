use crate::gui_bridge::model::VisualizationModel;
use crate::workflow::runner::Runner;
use log::{error, info, warn};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, hyper::body::Bytes, Filter};

const MAX_UPLOAD_BYTES: u64 = 32 * 1024 * 1024;

type SharedModel = Arc<RwLock<VisualizationModel>>;

pub fn gui_bind_address(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

/// Holds the latest processed series and serves it to a chart front end.
pub struct GuiBridge {
    state: SharedModel,
    runner: Arc<Runner>,
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        Self {
            state: Arc::new(RwLock::new(VisualizationModel::default())),
            runner,
        }
    }

    /// Starts the HTTP endpoint on a background thread.
    pub fn serve(&self, addr: SocketAddr) {
        let routes = routes(self.state.clone(), self.runner.clone());
        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build bridge runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                info!("chart bridge listening on http://{}", addr);
                warp::serve(routes).run(addr).await;
            });
        });
    }

    pub fn publish(&self, model: &VisualizationModel) {
        if let Ok(mut guard) = self.state.write() {
            *guard = model.clone();
        }
        println!(
            "[GUI] series points: {}, speed points: {}, gps fixes: {}",
            model.series.len(),
            model.series.speed.len(),
            model.summary.gps_fix_count
        );
    }

    pub fn publish_status(&self, message: &str) {
        println!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> VisualizationModel {
        self.state.read().unwrap().clone()
    }
}

fn routes(
    state: SharedModel,
    runner: Arc<Runner>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());
    let runner_filter = warp::any().map(move || runner.clone());

    let get_route = warp::path("series")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter.clone())
        .map(|state: SharedModel| {
            let model = state
                .read()
                .map(|guard| guard.clone())
                .unwrap_or_default();
            warp::reply::json(&model)
        });

    let ingest_route = warp::path("ingest")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_UPLOAD_BYTES))
        .and(warp::body::bytes())
        .and(state_filter)
        .and(runner_filter)
        .map(ingest);

    get_route.or(ingest_route)
}

fn ingest(
    body: Bytes,
    state: SharedModel,
    runner: Arc<Runner>,
) -> warp::reply::WithStatus<warp::reply::Json> {
    let outcome = std::str::from_utf8(&body)
        .map_err(anyhow::Error::from)
        .and_then(|text| runner.execute(text));

    match outcome {
        Ok(output) => {
            let model = VisualizationModel::from_output(&output, Some("ingest".into()));
            if let Ok(mut guard) = state.write() {
                *guard = model;
            }
            warp::reply::with_status(
                warp::reply::json(&json!({
                    "status": "ok",
                    "samples": output.summary.sample_count,
                    "maxSpeed": output.summary.max_speed,
                })),
                StatusCode::OK,
            )
        }
        Err(err) => {
            warn!("ingest error: {:#}", err);
            warp::reply::with_status(
                warp::reply::json(&json!({
                    "status": "error",
                    "message": format!("{:#}", err),
                })),
                StatusCode::BAD_REQUEST,
            )
        }
    }
}
