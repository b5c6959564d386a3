//! In-memory fakes for the store, the Lodestone source and the role provider.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tarubot_core::clock::ManualClock;
use tarubot_core::error::{SyncError, SyncResult};
use tarubot_core::types::{LodestoneId, Snowflake, Timestamp};
use tarubot_db::models::character::{Character, CreateCharacter};
use tarubot_db::models::free_company::FreeCompany;
use tarubot_db::models::guild_config::{GuildConfig, UpsertGuildConfig};
use tarubot_lodestone::records::{
    CharacterRecord, FreeCompanyRecord, FreeCompanyRef, MemberRecord, SearchHit,
};
use tarubot_lodestone::{LodestoneError, LodestoneSource};
use tarubot_sync::{GuildMember, LocalStore, RoleProvider, RoleProviderError, SyncContext};

pub const FC: &str = "9231253336202687179";
pub const OTHER_FC: &str = "9231253336202600001";
pub const GUILD: Snowflake = 1000;
pub const MEMBER_ROLE: Snowflake = 2001;
pub const GUEST_ROLE: Snowflake = 2002;

pub fn start() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap()
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeStore {
    pub characters: Mutex<BTreeMap<LodestoneId, Character>>,
    pub free_companies: Mutex<BTreeMap<LodestoneId, FreeCompany>>,
    pub guild_configs: Mutex<BTreeMap<Snowflake, GuildConfig>>,
    /// `(operation, n)`: the n-th call (1-based) of `operation` fails.
    fail_on: Mutex<Option<(&'static str, usize)>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    /// Yield to the runtime before every call, like a real database round trip.
    yield_on_call: AtomicBool,
    /// `set_character_owner` deletes the row instead, as if it vanished first.
    delete_on_set_owner: AtomicBool,
}

impl FakeStore {
    pub fn fail_on(&self, operation: &'static str, nth_call: usize) {
        *lock(&self.fail_on) = Some((operation, nth_call));
    }

    pub fn calls(&self, operation: &'static str) -> usize {
        lock(&self.calls).get(operation).copied().unwrap_or(0)
    }

    pub fn yield_on_call(&self) {
        self.yield_on_call.store(true, Ordering::SeqCst);
    }

    pub fn delete_on_set_owner(&self) {
        self.delete_on_set_owner.store(true, Ordering::SeqCst);
    }

    async fn record(&self, operation: &'static str) -> SyncResult<()> {
        if self.yield_on_call.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        let mut calls = lock(&self.calls);
        let count = calls.entry(operation).or_insert(0);
        *count += 1;
        match *lock(&self.fail_on) {
            Some((op, n)) if op == operation && n == *count => Err(SyncError::StoreFailure(
                format!("injected failure in {operation}"),
            )),
            _ => Ok(()),
        }
    }

    pub fn seed_character(
        &self,
        id: &str,
        name: &str,
        owner_id: Option<Snowflake>,
        free_company_id: Option<&str>,
        last_synced_at: Timestamp,
    ) {
        lock(&self.characters).insert(
            id.to_string(),
            Character {
                id: id.to_string(),
                name: name.to_string(),
                owner_id,
                free_company_id: free_company_id.map(str::to_string),
                last_synced_at,
                created_at: last_synced_at,
                updated_at: last_synced_at,
            },
        );
    }

    pub fn seed_free_company(&self, id: &str, name: &str, last_synced_at: Timestamp) {
        lock(&self.free_companies).insert(
            id.to_string(),
            FreeCompany {
                id: id.to_string(),
                name: name.to_string(),
                last_synced_at,
                created_at: last_synced_at,
                updated_at: last_synced_at,
            },
        );
    }

    pub fn seed_guild(
        &self,
        member: Option<Snowflake>,
        guest: Option<Snowflake>,
        fc: Option<&str>,
    ) {
        let at = start();
        lock(&self.guild_configs).insert(
            GUILD,
            GuildConfig {
                guild_id: GUILD,
                member_role_id: member,
                guest_role_id: guest,
                free_company_id: fc.map(str::to_string),
                created_at: at,
                updated_at: at,
            },
        );
    }

    pub fn character(&self, id: &str) -> Option<Character> {
        lock(&self.characters).get(id).cloned()
    }

    pub fn free_company(&self, id: &str) -> Option<FreeCompany> {
        lock(&self.free_companies).get(id).cloned()
    }
}

#[async_trait]
impl LocalStore for FakeStore {
    async fn get_character(&self, id: &str) -> SyncResult<Option<Character>> {
        self.record("get_character").await?;
        Ok(self.character(id))
    }

    async fn create_character(&self, input: &CreateCharacter) -> SyncResult<Character> {
        self.record("create_character").await?;
        let mut characters = lock(&self.characters);
        if characters.contains_key(&input.id) {
            return Err(SyncError::StoreFailure(format!("duplicate character {}", input.id)));
        }
        let character = Character {
            id: input.id.clone(),
            name: input.name.clone(),
            owner_id: input.owner_id,
            free_company_id: input.free_company_id.clone(),
            last_synced_at: input.last_synced_at,
            created_at: input.last_synced_at,
            updated_at: input.last_synced_at,
        };
        characters.insert(input.id.clone(), character.clone());
        Ok(character)
    }

    async fn update_character(
        &self,
        id: &str,
        name: &str,
        free_company_id: Option<&str>,
        synced_at: Timestamp,
    ) -> SyncResult<Option<Character>> {
        self.record("update_character").await?;
        let mut characters = lock(&self.characters);
        Ok(characters.get_mut(id).map(|c| {
            c.name = name.to_string();
            c.free_company_id = free_company_id.map(str::to_string);
            c.last_synced_at = c.last_synced_at.max(synced_at);
            c.clone()
        }))
    }

    async fn set_character_owner(
        &self,
        id: &str,
        owner_id: Snowflake,
    ) -> SyncResult<Option<Character>> {
        self.record("set_character_owner").await?;
        let mut characters = lock(&self.characters);
        if self.delete_on_set_owner.load(Ordering::SeqCst) {
            characters.remove(id);
            return Ok(None);
        }
        Ok(characters
            .get_mut(id)
            .filter(|c| c.owner_id.is_none())
            .map(|c| {
                c.owner_id = Some(owner_id);
                c.clone()
            }))
    }

    async fn delete_character(&self, id: &str, owner_id: Option<Snowflake>) -> SyncResult<u64> {
        self.record("delete_character").await?;
        let mut characters = lock(&self.characters);
        let matches = characters
            .get(id)
            .is_some_and(|c| owner_id.is_none() || c.owner_id == owner_id);
        if matches {
            characters.remove(id);
            Ok(1)
        } else {
            Ok(0)
        }
    }

    async fn list_characters_by_owner(&self, owner_id: Snowflake) -> SyncResult<Vec<Character>> {
        self.record("list_characters_by_owner").await?;
        Ok(lock(&self.characters)
            .values()
            .filter(|c| c.owner_id == Some(owner_id))
            .cloned()
            .collect())
    }

    async fn list_characters_by_free_company(
        &self,
        free_company_id: &str,
    ) -> SyncResult<Vec<Character>> {
        self.record("list_characters_by_free_company").await?;
        Ok(lock(&self.characters)
            .values()
            .filter(|c| c.free_company_id.as_deref() == Some(free_company_id))
            .cloned()
            .collect())
    }

    async fn get_free_company(&self, id: &str) -> SyncResult<Option<FreeCompany>> {
        self.record("get_free_company").await?;
        Ok(self.free_company(id))
    }

    async fn create_free_company(
        &self,
        id: &str,
        name: &str,
        synced_at: Timestamp,
    ) -> SyncResult<FreeCompany> {
        self.record("create_free_company").await?;
        if self.free_company(id).is_some() {
            return Err(SyncError::StoreFailure(format!("duplicate free company {id}")));
        }
        self.seed_free_company(id, name, synced_at);
        Ok(self.free_company(id).unwrap())
    }

    async fn update_free_company(
        &self,
        id: &str,
        name: &str,
        synced_at: Timestamp,
    ) -> SyncResult<Option<FreeCompany>> {
        self.record("update_free_company").await?;
        let mut fcs = lock(&self.free_companies);
        Ok(fcs.get_mut(id).map(|fc| {
            fc.name = name.to_string();
            fc.last_synced_at = fc.last_synced_at.max(synced_at);
            fc.clone()
        }))
    }

    async fn ensure_free_company(
        &self,
        id: &str,
        name: &str,
        synced_at: Timestamp,
    ) -> SyncResult<bool> {
        self.record("ensure_free_company").await?;
        if self.free_company(id).is_some() {
            return Ok(false);
        }
        self.seed_free_company(id, name, synced_at);
        Ok(true)
    }

    async fn get_guild_config(&self, guild_id: Snowflake) -> SyncResult<Option<GuildConfig>> {
        self.record("get_guild_config").await?;
        Ok(lock(&self.guild_configs).get(&guild_id).cloned())
    }

    async fn upsert_guild_config(
        &self,
        guild_id: Snowflake,
        input: &UpsertGuildConfig,
    ) -> SyncResult<GuildConfig> {
        self.record("upsert_guild_config").await?;
        let at = start();
        let mut configs = lock(&self.guild_configs);
        let config = configs.entry(guild_id).or_insert_with(|| GuildConfig {
            guild_id,
            member_role_id: None,
            guest_role_id: None,
            free_company_id: None,
            created_at: at,
            updated_at: at,
        });
        if input.member_role_id.is_some() {
            config.member_role_id = input.member_role_id;
        }
        if input.guest_role_id.is_some() {
            config.guest_role_id = input.guest_role_id;
        }
        if input.free_company_id.is_some() {
            config.free_company_id = input.free_company_id.clone();
        }
        Ok(config.clone())
    }

    async fn list_guild_configs(&self) -> SyncResult<Vec<GuildConfig>> {
        self.record("list_guild_configs").await?;
        Ok(lock(&self.guild_configs).values().cloned().collect())
    }
}

// ---------------------------------------------------------------------------
// Lodestone
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeSource {
    pub characters: Mutex<HashMap<LodestoneId, CharacterRecord>>,
    pub free_companies: Mutex<HashMap<LodestoneId, FreeCompanyRecord>>,
    pub rosters: Mutex<HashMap<LodestoneId, Vec<MemberRecord>>>,
    pub search_hits: Mutex<Vec<SearchHit>>,
    /// When set, every call fails with a 503.
    pub unavailable: Mutex<bool>,
    pub character_calls: AtomicUsize,
    pub free_company_calls: AtomicUsize,
    pub roster_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
}

impl FakeSource {
    pub fn add_character(&self, id: &str, name: &str, fc: Option<(&str, Option<&str>)>) {
        lock(&self.characters).insert(
            id.to_string(),
            CharacterRecord {
                id: id.to_string(),
                name: name.to_string(),
                world: "Ravana".to_string(),
                free_company: fc.map(|(fc_id, fc_name)| FreeCompanyRef {
                    id: fc_id.to_string(),
                    name: fc_name.map(str::to_string),
                }),
            },
        );
    }

    pub fn add_free_company(&self, id: &str, name: &str, roster: &[(&str, &str)]) {
        lock(&self.free_companies).insert(
            id.to_string(),
            FreeCompanyRecord {
                id: id.to_string(),
                name: name.to_string(),
                world: "Ravana".to_string(),
            },
        );
        lock(&self.rosters).insert(
            id.to_string(),
            roster
                .iter()
                .map(|(member_id, member_name)| MemberRecord {
                    id: member_id.to_string(),
                    name: member_name.to_string(),
                    world: "Ravana".to_string(),
                })
                .collect(),
        );
    }

    pub fn set_search_hits(&self, hits: &[(&str, &str)]) {
        *lock(&self.search_hits) = hits
            .iter()
            .map(|(id, name)| SearchHit {
                id: id.to_string(),
                name: name.to_string(),
                world: "Ravana".to_string(),
            })
            .collect();
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        *lock(&self.unavailable) = unavailable;
    }

    pub fn character_calls(&self) -> usize {
        self.character_calls.load(Ordering::SeqCst)
    }

    pub fn free_company_calls(&self) -> usize {
        self.free_company_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), LodestoneError> {
        if *lock(&self.unavailable) {
            return Err(LodestoneError::ApiError {
                status: 503,
                body: "maintenance".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl LodestoneSource for FakeSource {
    async fn character(&self, id: &str) -> Result<CharacterRecord, LodestoneError> {
        self.character_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        lock(&self.characters)
            .get(id)
            .cloned()
            .ok_or_else(|| LodestoneError::NotFound {
                entity: "character",
                id: id.to_string(),
            })
    }

    async fn search_characters(
        &self,
        _first_name: &str,
        _last_name: &str,
        _world: &str,
    ) -> Result<Vec<SearchHit>, LodestoneError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(lock(&self.search_hits).clone())
    }

    async fn free_company(&self, id: &str) -> Result<FreeCompanyRecord, LodestoneError> {
        self.free_company_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        lock(&self.free_companies)
            .get(id)
            .cloned()
            .ok_or_else(|| LodestoneError::NotFound {
                entity: "free company",
                id: id.to_string(),
            })
    }

    async fn free_company_members(&self, id: &str) -> Result<Vec<MemberRecord>, LodestoneError> {
        self.roster_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        lock(&self.rosters)
            .get(id)
            .cloned()
            .ok_or_else(|| LodestoneError::NotFound {
                entity: "free company",
                id: id.to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleCall {
    Fetch(Snowflake),
    Add(Snowflake, Snowflake),
    Remove(Snowflake, Snowflake),
}

#[derive(Default)]
pub struct FakeRoles {
    /// user id -> held role ids, all within [`GUILD`].
    pub members: Mutex<HashMap<Snowflake, HashSet<Snowflake>>>,
    /// Roles whose add/remove is rejected with a 403.
    pub forbidden_roles: Mutex<HashSet<Snowflake>>,
    pub calls: Mutex<Vec<RoleCall>>,
}

impl FakeRoles {
    pub fn join(&self, user_id: Snowflake, roles: &[Snowflake]) {
        lock(&self.members).insert(user_id, roles.iter().copied().collect());
    }

    pub fn forbid(&self, role_id: Snowflake) {
        lock(&self.forbidden_roles).insert(role_id);
    }

    pub fn held(&self, user_id: Snowflake) -> HashSet<Snowflake> {
        lock(&self.members).get(&user_id).cloned().unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<RoleCall> {
        lock(&self.calls).clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| !matches!(c, RoleCall::Fetch(_)))
            .count()
    }

    fn check_allowed(&self, role_id: Snowflake) -> Result<(), RoleProviderError> {
        if lock(&self.forbidden_roles).contains(&role_id) {
            return Err(RoleProviderError::ApiError {
                status: 403,
                body: "Missing Permissions".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RoleProvider for FakeRoles {
    async fn fetch_member(
        &self,
        _guild_id: Snowflake,
        user_id: Snowflake,
    ) -> Result<Option<GuildMember>, RoleProviderError> {
        lock(&self.calls).push(RoleCall::Fetch(user_id));
        Ok(lock(&self.members).get(&user_id).map(|roles| {
            let mut role_ids: Vec<_> = roles.iter().copied().collect();
            role_ids.sort_unstable();
            GuildMember { user_id, role_ids }
        }))
    }

    async fn add_role(
        &self,
        _guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> Result<(), RoleProviderError> {
        lock(&self.calls).push(RoleCall::Add(user_id, role_id));
        self.check_allowed(role_id)?;
        lock(&self.members).entry(user_id).or_default().insert(role_id);
        Ok(())
    }

    async fn remove_role(
        &self,
        _guild_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> Result<(), RoleProviderError> {
        lock(&self.calls).push(RoleCall::Remove(user_id, role_id));
        self.check_allowed(role_id)?;
        lock(&self.members).entry(user_id).or_default().remove(&role_id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub store: Arc<FakeStore>,
    pub source: Arc<FakeSource>,
    pub roles: Arc<FakeRoles>,
    pub clock: Arc<ManualClock>,
    pub ctx: SyncContext,
}

pub fn harness() -> Harness {
    let store = Arc::new(FakeStore::default());
    let source = Arc::new(FakeSource::default());
    let roles = Arc::new(FakeRoles::default());
    let clock = Arc::new(ManualClock::new(start()));
    let ctx = SyncContext::new(store.clone(), source.clone(), roles.clone(), clock.clone());
    Harness {
        store,
        source,
        roles,
        clock,
        ctx,
    }
}
