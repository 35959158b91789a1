//! Remote catalog client for the PokeAPI.
//!
//! Every operation is a single HTTP GET mapped onto a parsed response; no
//! retries, no timeouts beyond the client defaults, no caching. Failures
//! surface to the immediate caller as [`ApiError`].

use std::sync::OnceLock;

use serde::Deserialize;

use crate::state::{
    artwork_url, id_from_url, AbilityRef, EntryBundle, EntryDetail, EntryRef, EvolutionStage,
    StatValue, PAGE_SIZE,
};

const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";

/// Chains from the API are forward-only trees, so a walk cannot loop; the
/// cap only bounds pathologically deep input.
const MAX_CHAIN_HOPS: usize = 16;

static API_BASE: OnceLock<String> = OnceLock::new();

/// Override the API base URL. First call wins; later calls are ignored.
pub fn set_base_url(url: String) {
    let _ = API_BASE.set(url.trim_end_matches('/').to_string());
}

fn base_url() -> &'static str {
    API_BASE.get().map(String::as_str).unwrap_or(DEFAULT_API_BASE)
}

#[derive(Debug)]
pub enum ApiError {
    /// Network or parse failure on any call.
    Transport(String),
    /// The backing resource does not exist (HTTP 404).
    NotFound(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Transport(message) => write!(f, "request failed: {message}"),
            ApiError::NotFound(key) => write!(f, "not found: {key}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct TypeDetailResponse {
    pokemon: Vec<TypePokemonEntry>,
}

#[derive(Clone, Debug, Deserialize)]
struct TypePokemonEntry {
    pokemon: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct EntrySummaryResponse {
    id: u32,
    name: String,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    abilities: Vec<PokemonAbilitySlot>,
    sprites: serde_json::Value,
    cries: Option<PokemonCries>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
    is_hidden: bool,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonCries {
    latest: Option<String>,
    legacy: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
struct SpeciesResponse {
    evolution_chain: Option<ApiResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct ApiResource {
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct EvolutionChainResponse {
    chain: ChainLink,
}

#[derive(Clone, Debug, Deserialize)]
struct ChainLink {
    species: NamedResource,
    evolves_to: Vec<ChainLink>,
}

/// One page of the full catalog, 20 entries per page.
pub async fn fetch_entry_page(offset: u32) -> Result<Vec<EntryRef>, ApiError> {
    let url = format!("{}/pokemon?limit={PAGE_SIZE}&offset={offset}", base_url());
    let response: ListResponse = get_json(&url).await?;
    Ok(response
        .results
        .into_iter()
        .map(|entry| EntryRef {
            name: entry.name,
            url: entry.url,
        })
        .collect())
}

/// Exact lookup by name or id. The key is trimmed and lowercased before it
/// goes on the wire; a 404 surfaces as [`ApiError::NotFound`] so the caller
/// can render an empty result instead of a generic error.
pub async fn lookup_entry(key: &str) -> Result<EntryRef, ApiError> {
    let key = key.trim().to_lowercase();
    let url = format!("{}/pokemon/{}", base_url(), urlencoding::encode(&key));
    let response: EntrySummaryResponse = match get_json(&url).await {
        Ok(response) => response,
        Err(ApiError::NotFound(_)) => return Err(ApiError::NotFound(key)),
        Err(err) => return Err(err),
    };
    Ok(EntryRef {
        url: format!("{}/pokemon/{}/", base_url(), response.id),
        name: response.name,
    })
}

/// All entries carrying the given type tag. The `all` sentinel never
/// reaches this function; the reducer routes it to [`fetch_entry_page`].
pub async fn fetch_type_entries(type_name: &str) -> Result<Vec<EntryRef>, ApiError> {
    let url = format!("{}/type/{type_name}", base_url());
    let response: TypeDetailResponse = get_json(&url).await?;
    Ok(response
        .pokemon
        .into_iter()
        .map(|entry| EntryRef {
            name: entry.pokemon.name,
            url: entry.pokemon.url,
        })
        .collect())
}

pub async fn fetch_entry_detail(id: u32) -> Result<EntryDetail, ApiError> {
    let url = format!("{}/pokemon/{id}", base_url());
    let response: PokemonResponse = get_json(&url).await?;

    let types = response
        .types
        .into_iter()
        .map(|slot| slot.type_info.name)
        .collect();
    let stats = response
        .stats
        .into_iter()
        .map(|slot| StatValue {
            name: slot.stat.name,
            value: slot.base_stat,
        })
        .collect();
    let abilities = response
        .abilities
        .into_iter()
        .map(|slot| AbilityRef {
            name: slot.ability.name,
            hidden: slot.is_hidden,
        })
        .collect();
    let artwork = pointer_string(&response.sprites, "/other/official-artwork/front_default")
        .unwrap_or_else(|| artwork_url(response.id));

    Ok(EntryDetail {
        id: response.id,
        name: response.name,
        types,
        stats,
        abilities,
        artwork_url: artwork,
        cry_url: response
            .cries
            .as_ref()
            .and_then(|cries| cries.latest.clone().or_else(|| cries.legacy.clone())),
    })
}

/// The species record only contributes the evolution-chain pointer here.
/// Species and entry share the same numeric id by API convention; that is
/// assumed, not re-validated.
pub async fn fetch_chain_url(id: u32) -> Result<Option<String>, ApiError> {
    let url = format!("{}/pokemon-species/{id}", base_url());
    let response: SpeciesResponse = get_json(&url).await?;
    Ok(response.evolution_chain.map(|chain| chain.url))
}

pub async fn fetch_evolution_chain(url: &str) -> Result<Vec<EvolutionStage>, ApiError> {
    let response: EvolutionChainResponse = get_json(url).await?;
    Ok(resolve_chain(&response.chain))
}

/// Compose the inspection bundle: entry detail, then the species' chain
/// pointer, then the chain itself. The stages run strictly in that order
/// and any failure fails the whole composition; partial results are
/// discarded rather than shown.
pub async fn compose_entry_bundle(id: u32) -> Result<EntryBundle, ApiError> {
    let detail = fetch_entry_detail(id).await?;
    let evolution = match fetch_chain_url(id).await? {
        Some(url) => fetch_evolution_chain(&url).await?,
        // No chain on record: the entry itself is the only stage.
        None => vec![EvolutionStage {
            name: detail.name.clone(),
            id,
            image_url: artwork_url(id),
        }],
    };
    Ok(EntryBundle { detail, evolution })
}

pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, ApiError> {
    let response = http_client()
        .get(url)
        .send()
        .await
        .map_err(|err| ApiError::Transport(err.to_string()))?;
    let response = response
        .error_for_status()
        .map_err(|err| ApiError::Transport(err.to_string()))?;
    Ok(response
        .bytes()
        .await
        .map_err(|err| ApiError::Transport(err.to_string()))?
        .to_vec())
}

/// Walk the chain root-to-tip along the first listed evolution at each
/// fork; alternate branches are not represented. A species URL that fails
/// to parse ends the walk.
fn resolve_chain(root: &ChainLink) -> Vec<EvolutionStage> {
    let mut stages = Vec::new();
    let mut node = Some(root);
    while let Some(link) = node {
        if stages.len() >= MAX_CHAIN_HOPS {
            break;
        }
        let Some(id) = id_from_url(&link.species.url) else {
            break;
        };
        stages.push(EvolutionStage {
            name: link.species.name.clone(),
            id,
            image_url: artwork_url(id),
        });
        node = link.evolves_to.first();
    }
    stages
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

async fn get_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, ApiError> {
    let response = http_client()
        .get(url)
        .send()
        .await
        .map_err(|err| ApiError::Transport(err.to_string()))?;
    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(url.to_string()));
    }
    let response = response
        .error_for_status()
        .map_err(|err| ApiError::Transport(err.to_string()))?;
    response
        .json()
        .await
        .map_err(|err| ApiError::Transport(err.to_string()))
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}
