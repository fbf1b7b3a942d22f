use std::{error::Error, fmt};

use axum::{
    async_trait,
    extract::{
        multipart::MultipartError, rejection::JsonRejection, FromRequest, Multipart, Path,
        Request, State,
    },
    http::{header, HeaderMap, StatusCode},
    routing::{get, on, post},
    Json, Router,
};
use bus_pass::{
    database::Database,
    photo::{Photo, PhotoStore},
    RequestError,
};
use model::{bus_pass::BusPass, WithId};
use serde::Serialize;
use utility::{id::Id, serde::date};

use crate::{
    common::{route_not_found, schema, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

const PHOTO_FIELD: &str = "photo";
const CREATE_FAILED: &str = "Failed to create bus pass";

pub(crate) fn routes<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .route("/schema", get(schema::<BusPass>))
        .route("/:id", get(get_bus_pass::<D>))
        .route("/", post(create_bus_pass::<D>))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BusPassCreated {
    message: &'static str,
    bus_pass: WithId<BusPass>,
}

async fn create_bus_pass<D: Database>(
    State(WebState {
        bus_pass_client,
        photo_store,
    }): State<WebState<D>>,
    submission: Submission,
) -> RouteResult<(StatusCode, Json<BusPassCreated>)> {
    let failed =
        |why: RequestError| RouteErrorResponse::from(why).with_failure_message(CREATE_FAILED);

    let (mut bus_pass, photo) = match submission {
        Submission::Json(bus_pass) => (
            BusPass {
                photo: None,
                ..bus_pass
            },
            None,
        ),
        Submission::Form(multipart) => {
            let (form, photo) = read_form(multipart).await?;
            let bus_pass = form
                .into_bus_pass()
                .map_err(|why| failed(RequestError::other(why)))?;
            (bus_pass, photo)
        }
    };

    // rejected submissions must not leave a photo behind
    bus_pass_client
        .check_bus_pass(&bus_pass)
        .await
        .map_err(failed)?;
    bus_pass.photo = store_photo(photo_store.as_ref(), photo)
        .await
        .map_err(failed)?;

    let stored = bus_pass_client
        .create_bus_pass(bus_pass)
        .await
        .map_err(failed)?;
    log::info!("created bus pass {}", stored.id);

    Ok((
        StatusCode::CREATED,
        Json(BusPassCreated {
            message: "Bus pass created successfully",
            bus_pass: stored,
        }),
    ))
}

async fn get_bus_pass<D: Database>(
    Path(id): Path<i64>,
    State(WebState {
        bus_pass_client, ..
    }): State<WebState<D>>,
) -> RouteResult<Json<WithId<BusPass>>> {
    bus_pass_client
        .get_bus_pass(Id::new(id))
        .await
        .map(Json)
        .map_err(|why| {
            RouteErrorResponse::from(why).with_failure_message("Failed to fetch bus pass")
        })
}

async fn store_photo(
    photo_store: &dyn PhotoStore,
    photo: Option<Photo>,
) -> Result<Option<String>, RequestError> {
    match photo {
        Some(photo) if !photo.is_empty() => Ok(Some(photo_store.store(photo).await?)),
        _ => Ok(None),
    }
}

// - Submission -

/// A pass submission: a multipart form, optionally carrying a photo, or a
/// json body without one. Anything that is not json is read as a form.
enum Submission {
    Form(Multipart),
    Json(BusPass),
}

#[async_trait]
impl<S> FromRequest<S> for Submission
where
    S: Send + Sync,
{
    type Rejection = RouteErrorResponse;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json(request.headers()) {
            return Multipart::from_request(request, state)
                .await
                .map(Self::Form)
                .map_err(|why| RouteErrorResponse::new(why.status()).with_error(why.body_text()));
        }

        match Json::<BusPass>::from_request(request, state).await {
            Ok(Json(bus_pass)) => Ok(Self::Json(bus_pass)),
            // well formed json the record can not hold, same as a failed form cast
            Err(JsonRejection::JsonDataError(why)) => {
                Err(RouteErrorResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
                    .with_message(CREATE_FAILED)
                    .with_error(why.body_text()))
            }
            Err(why) => Err(RouteErrorResponse::new(why.status()).with_error(why.body_text())),
        }
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false)
}

// - Form parsing -

/// The text fields of the submitted form, as sent.
#[derive(Debug, Default)]
struct BusPassForm {
    name: Option<String>,
    email: Option<String>,
    valid_till: Option<String>,
    pass_type: Option<String>,
    route: Option<String>,
    college_name: Option<String>,
    source: Option<String>,
    destination: Option<String>,
    price: Option<String>,
}

impl BusPassForm {
    /// Records a text field. Unknown fields are ignored, repeated fields keep
    /// their first value.
    fn set(&mut self, field: &str, value: String) {
        let slot = match field {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "validTill" => &mut self.valid_till,
            "passType" => &mut self.pass_type,
            "route" => &mut self.route,
            "collegeName" => &mut self.college_name,
            "source" => &mut self.source,
            "destination" => &mut self.destination,
            "price" => &mut self.price,
            _ => return,
        };
        slot.get_or_insert(value);
    }

    /// Text fields are stored verbatim. `validTill` and `price` are cast, an
    /// empty value casts to null.
    fn into_bus_pass(self) -> Result<BusPass, CastError> {
        let valid_till = non_empty(self.valid_till)
            .map(|value| {
                date::parse(&value).map_err(|_| CastError::new("Date", "validTill", value))
            })
            .transpose()?;
        let price = non_empty(self.price)
            .map(|value| match value.trim().parse::<f64>() {
                Ok(price) if price.is_finite() => Ok(price),
                _ => Err(CastError::new("Number", "price", value)),
            })
            .transpose()?;

        Ok(BusPass {
            name: self.name,
            email: self.email,
            valid_till,
            photo: None,
            pass_type: self.pass_type,
            route: self.route,
            college_name: self.college_name,
            source: self.source,
            destination: self.destination,
            price,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// A form value the store can not represent in the field's type.
#[derive(Debug)]
struct CastError {
    kind: &'static str,
    path: &'static str,
    value: String,
}

impl CastError {
    fn new(kind: &'static str, path: &'static str, value: String) -> Self {
        Self { kind, path, value }
    }
}

impl fmt::Display for CastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cast to {} failed for value {:?} at path {:?}",
            self.kind, self.value, self.path
        )
    }
}

impl Error for CastError {}

async fn read_form(mut multipart: Multipart) -> RouteResult<(BusPassForm, Option<Photo>)> {
    let mut form = BusPassForm::default();
    let mut photo = None;
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_owned();
        if name != PHOTO_FIELD {
            let value = field.text().await.map_err(malformed)?;
            form.set(&name, value);
            continue;
        }
        // only a file part is an upload, a plain text `photo` is dropped
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let bytes = field.bytes().await.map_err(malformed)?;
        if photo.is_none() {
            photo = Some(Photo::new(Some(file_name), bytes.to_vec()));
        }
    }
    Ok((form, photo))
}

fn malformed(why: MultipartError) -> RouteErrorResponse {
    RouteErrorResponse::new(why.status()).with_error(why.body_text())
}
