use iced::widget::image::Handle;
use iced::widget::{button, column, horizontal_space, row, text};
use iced::{Alignment, Element, Task, Theme};
use rfd::FileDialog;
use chrono::Utc;
use std::collections::HashMap;

mod identify;
mod state;
mod ui;

use identify::capture::{self, CapturedPhoto};
use identify::client::IdentifyClient;
use state::coin::{self, Coin};
use state::collection::Collection;
use state::derive::{SortKey, SortOrder};

/// Which coin face a capture message refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Front,
    Back,
}

/// The screens the application can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Dashboard,
    Collection,
    Add,
    Details,
}

/// Editable fields of the pending entry's review form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingField {
    Name,
    Country,
    Year,
    Denomination,
    Value,
    Composition,
    Condition,
    Description,
    RarityDetails,
}

/// A prepared face photo plus its decoded preview handle
#[derive(Debug, Clone)]
struct PendingPhoto {
    photo: CapturedPhoto,
    preview: Handle,
}

impl PendingPhoto {
    fn new(photo: CapturedPhoto) -> Self {
        let preview = Handle::from_bytes(photo.jpeg.clone());
        PendingPhoto { photo, preview }
    }
}

/// Decoded image handles for one stored coin, cached so the grid does
/// not re-decode data URLs on every frame
#[derive(Debug, Clone)]
struct CoinPhotos {
    front: Handle,
    back: Handle,
}

impl CoinPhotos {
    /// Build handles for a record. Yields None when the front reference
    /// is not an embedded image this build can decode (e.g. an external
    /// URL); the UI shows a placeholder instead.
    fn for_coin(coin: &Coin) -> Option<Self> {
        let front = capture::decode_data_url(&coin.front_image_url)?;
        let back = capture::decode_data_url(&coin.back_image_url).unwrap_or_else(|| front.clone());

        Some(CoinPhotos {
            front: Handle::from_bytes(front),
            back: Handle::from_bytes(back),
        })
    }
}

/// An in-progress coin entry, not yet part of the collection
#[derive(Debug, Clone, Default)]
struct PendingEntry {
    front: Option<PendingPhoto>,
    back: Option<PendingPhoto>,
    /// An identification request is in flight
    identifying: bool,
    /// Identification succeeded and the review step is active
    identified: bool,
    error: Option<String>,
    fields: PendingFields,
    is_rare: bool,
    sources: Vec<String>,
}

/// String buffers behind the review form inputs
#[derive(Debug, Clone, Default)]
struct PendingFields {
    name: String,
    country: String,
    year: String,
    denomination: String,
    value: String,
    composition: String,
    condition: String,
    description: String,
    rarity_details: String,
}

impl PendingFields {
    /// Seed the form from a normalized identification result
    fn from_coin(coin: &Coin) -> Self {
        PendingFields {
            name: coin.name.clone(),
            country: coin.country.clone(),
            year: coin.year.map(|y| y.to_string()).unwrap_or_default(),
            value: if coin.value > 0.0 {
                format!("{:.2}", coin.value)
            } else {
                String::new()
            },
            denomination: coin.denomination.clone(),
            composition: coin.composition.clone(),
            condition: coin.condition.clone(),
            description: coin.description.clone(),
            rarity_details: coin.rarity_details.clone(),
        }
    }
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    ShowDashboard,
    ShowCollection,
    /// User pressed "Add Coin"
    StartAdd,
    /// User asked to pick a photo for one face
    PickPhoto(Face),
    /// Background photo preparation finished
    PhotoReady(Face, Result<CapturedPhoto, String>),
    /// User pressed "Identify Coin"
    Identify,
    /// Identification finished; the stamp tells stale answers apart
    IdentifyComplete(u64, Result<serde_json::Value, String>),
    PendingEdited(PendingField, String),
    PendingRareToggled(bool),
    SavePending,
    Retake,
    SelectCoin(String),
    CloseDetails,
    DeleteCoin(String),
    QueryChanged(String),
    SortKeyChanged(SortKey),
    SortOrderChanged(SortOrder),
}

/// Main application state
struct CoinCatalog {
    /// The persisted coin collection
    collection: Collection,
    screen: Screen,
    query: String,
    sort_key: SortKey,
    sort_order: SortOrder,
    /// Id of the coin shown on the details screen
    selected: Option<String>,
    /// In-progress entry on the add screen
    pending: Option<PendingEntry>,
    identify_client: IdentifyClient,
    /// Stamped on each identification request. Completions carrying an
    /// older stamp are ignored: a retake moved on without cancelling
    /// the in-flight request.
    request_generation: u64,
    /// Decoded image handles per coin id
    photo_cache: HashMap<String, CoinPhotos>,
    /// Status message to display to the user
    status: String,
}

impl CoinCatalog {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let collection = Collection::load();

        let mut photo_cache = HashMap::new();
        for coin in collection.coins() {
            if let Some(photos) = CoinPhotos::for_coin(coin) {
                photo_cache.insert(coin.id.clone(), photos);
            }
        }

        println!("🪙 Coin Catalog initialized with {} coins", collection.len());
        let status = format!("Ready. {} coins in the collection.", collection.len());

        (
            CoinCatalog {
                collection,
                screen: Screen::Dashboard,
                query: String::new(),
                sort_key: SortKey::Date,
                sort_order: SortOrder::Desc,
                selected: None,
                pending: None,
                identify_client: IdentifyClient::from_env(),
                request_generation: 0,
                photo_cache,
                status,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ShowDashboard => {
                self.screen = Screen::Dashboard;
                Task::none()
            }
            Message::ShowCollection => {
                self.screen = Screen::Collection;
                Task::none()
            }
            Message::StartAdd => {
                if self.pending.is_none() {
                    self.pending = Some(PendingEntry::default());
                }
                self.screen = Screen::Add;
                self.status = "Pick a photo of each face, then identify.".to_string();
                Task::none()
            }
            Message::PickPhoto(face) => {
                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title(match face {
                        Face::Front => "Select Front Photo",
                        Face::Back => "Select Back Photo",
                    })
                    .add_filter("Images", &["jpg", "jpeg", "png", "webp", "bmp"])
                    .pick_file();

                if let Some(path) = file {
                    self.status = format!("Preparing {}...", path.display());
                    return Task::perform(capture::prepare_photo(path), move |result| {
                        Message::PhotoReady(face, result)
                    });
                }

                Task::none()
            }
            Message::PhotoReady(face, result) => {
                let Some(pending) = self.pending.as_mut() else {
                    return Task::none();
                };

                match result {
                    Ok(photo) => {
                        let slot = PendingPhoto::new(photo);
                        match face {
                            Face::Front => pending.front = Some(slot),
                            Face::Back => pending.back = Some(slot),
                        }
                        pending.error = None;
                        self.status = if pending.front.is_some() && pending.back.is_some() {
                            "Both faces ready. Identify when you are.".to_string()
                        } else {
                            "One face ready, one to go.".to_string()
                        };
                    }
                    Err(e) => {
                        pending.error = Some(e);
                        self.status = "⚠️  Could not prepare the photo.".to_string();
                    }
                }

                Task::none()
            }
            Message::Identify => {
                let Some(pending) = self.pending.as_mut() else {
                    return Task::none();
                };
                if pending.identifying {
                    return Task::none();
                }
                let (Some(front), Some(back)) = (pending.front.clone(), pending.back.clone())
                else {
                    return Task::none();
                };

                pending.identifying = true;
                pending.error = None;
                self.request_generation += 1;
                let generation = self.request_generation;
                self.status = "🔍 Identifying coin...".to_string();

                let client = self.identify_client.clone();
                Task::perform(
                    async move {
                        client
                            .identify(&front.photo, &back.photo)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    move |result| Message::IdentifyComplete(generation, result),
                )
            }
            Message::IdentifyComplete(generation, result) => {
                if generation != self.request_generation {
                    // A retake or newer request made this answer stale
                    println!("⏳ Ignoring stale identification result");
                    return Task::none();
                }
                let Some(pending) = self.pending.as_mut() else {
                    return Task::none();
                };
                pending.identifying = false;

                match result {
                    Ok(payload) => {
                        // The normalizer absorbs whatever shape the
                        // model produced; no partial record is stored
                        let identified = coin::normalize(&payload);
                        pending.fields = PendingFields::from_coin(&identified);
                        pending.is_rare = identified.is_rare;
                        pending.sources = identified.sources;
                        pending.identified = true;
                        pending.error = None;

                        let name = if identified.name.is_empty() {
                            "unnamed coin".to_string()
                        } else {
                            identified.name
                        };
                        self.status = format!("✅ Identified: {}", name);
                    }
                    Err(e) => {
                        pending.error = Some(e);
                        self.status = "❌ Identification failed. You can try again.".to_string();
                    }
                }

                Task::none()
            }
            Message::PendingEdited(field, value) => {
                if let Some(pending) = self.pending.as_mut() {
                    let fields = &mut pending.fields;
                    match field {
                        PendingField::Name => fields.name = value,
                        PendingField::Country => fields.country = value,
                        PendingField::Year => fields.year = value,
                        PendingField::Denomination => fields.denomination = value,
                        PendingField::Value => fields.value = value,
                        PendingField::Composition => fields.composition = value,
                        PendingField::Condition => fields.condition = value,
                        PendingField::Description => fields.description = value,
                        PendingField::RarityDetails => fields.rarity_details = value,
                    }
                }
                Task::none()
            }
            Message::PendingRareToggled(is_rare) => {
                if let Some(pending) = self.pending.as_mut() {
                    pending.is_rare = is_rare;
                }
                Task::none()
            }
            Message::SavePending => {
                let Some(pending) = self.pending.as_mut() else {
                    return Task::none();
                };
                if pending.fields.name.trim().is_empty() {
                    pending.error = Some("A name is required before saving.".to_string());
                    return Task::none();
                }
                let (Some(front), Some(back)) = (pending.front.clone(), pending.back.clone())
                else {
                    pending.error = Some("Both face photos are required.".to_string());
                    return Task::none();
                };

                // Hand-edited buffers go through the same coercions as
                // identification payloads
                let fields = &pending.fields;
                let coin = Coin {
                    id: Coin::new_id(),
                    name: fields.name.trim().to_string(),
                    country: fields.country.trim().to_string(),
                    year: coin::parse_year_text(&fields.year),
                    denomination: fields.denomination.trim().to_string(),
                    value: coin::parse_value_text(&fields.value),
                    composition: fields.composition.trim().to_string(),
                    description: fields.description.trim().to_string(),
                    condition: fields.condition.trim().to_string(),
                    is_rare: pending.is_rare,
                    rarity_details: if pending.is_rare {
                        fields.rarity_details.trim().to_string()
                    } else {
                        String::new()
                    },
                    date_added: Utc::now().timestamp(),
                    front_image_url: front.photo.data_url.clone(),
                    back_image_url: back.photo.data_url.clone(),
                    sources: pending.sources.clone(),
                };

                if let Some(photos) = CoinPhotos::for_coin(&coin) {
                    self.photo_cache.insert(coin.id.clone(), photos);
                }
                self.status = format!("✅ Added {} to the collection.", coin.name);
                self.collection.add(coin);
                self.pending = None;
                self.screen = Screen::Collection;

                Task::none()
            }
            Message::Retake => {
                // Abandon the pending result. An in-flight request is
                // not cancelled; its answer will simply arrive stale.
                self.request_generation += 1;
                self.pending = Some(PendingEntry::default());
                self.status = "Pick a photo of each face, then identify.".to_string();
                Task::none()
            }
            Message::SelectCoin(id) => {
                self.selected = Some(id);
                self.screen = Screen::Details;
                Task::none()
            }
            Message::CloseDetails => {
                self.selected = None;
                self.screen = Screen::Collection;
                Task::none()
            }
            Message::DeleteCoin(id) => {
                if self.collection.remove(&id) {
                    self.photo_cache.remove(&id);
                    self.status = "🗑️  Coin removed from the collection.".to_string();
                }
                // Any transient selection of the record is now invalid
                if self.selected.as_deref() == Some(id.as_str()) {
                    self.selected = None;
                    self.screen = Screen::Collection;
                }
                Task::none()
            }
            Message::QueryChanged(query) => {
                self.query = query;
                Task::none()
            }
            Message::SortKeyChanged(key) => {
                self.sort_key = key;
                Task::none()
            }
            Message::SortOrderChanged(order) => {
                self.sort_order = order;
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let screen: Element<Message> = match self.screen {
            Screen::Dashboard => ui::dashboard::view(self),
            Screen::Collection => ui::collection::view(self),
            Screen::Add => ui::add::view(self),
            Screen::Details => ui::details::view(self),
        };

        column![self.nav_bar(), screen, text(&self.status).size(14)]
            .spacing(15)
            .padding(20)
            .into()
    }

    fn nav_bar(&self) -> Element<Message> {
        let tab = |label: &'static str, target: Screen, message: Message| {
            let style = if self.screen == target {
                button::primary
            } else {
                button::secondary
            };
            button(label).style(style).on_press(message)
        };

        row![
            text("🪙 Coin Catalog").size(22),
            horizontal_space(),
            tab("Dashboard", Screen::Dashboard, Message::ShowDashboard),
            tab("Collection", Screen::Collection, Message::ShowCollection),
            tab("Add Coin", Screen::Add, Message::StartAdd),
        ]
        .spacing(10)
        .align_y(Alignment::Center)
        .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    iced::application(
        "Coin Catalog",
        CoinCatalog::update,
        CoinCatalog::view,
    )
    .theme(CoinCatalog::theme)
    .centered()
    .run_with(CoinCatalog::new)
}
