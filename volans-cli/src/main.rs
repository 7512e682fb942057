mod config;

use std::collections::{HashMap, HashSet};
use std::io::Write as _;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use volans_core::convert::{json_to_value, value_to_json};
use volans_core::differ::create_plan;
use volans_core::merge::merge_maps;
use volans_core::effect::Effect;
use volans_core::plan::Plan;
use volans_core::provider::Provider;
use volans_core::resource::{Resource, ResourceId, State, Value};
use volans_core::schema::ResourceSchema;

use volans_provider_meraki::{MerakiProvider, ProviderConfig};
use volans_state::{BackendConfig, ResourceState, StateBackend, StateFile, create_backend};

use config::{DeclarationFile, ProviderSettings, load_declarations, to_resources};

const PROVIDER_NAME: &str = "meraki";

#[derive(Parser)]
#[command(name = "volans", version, about = "Declarative management for the Meraki dashboard")]
struct Cli {
    /// Declaration file
    #[arg(short, long, global = true, default_value = "volans.json")]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the declaration file against resource schemas
    Validate,
    /// Show what apply would change
    Plan,
    /// Apply the declared state to the dashboard
    Apply {
        /// Skip the interactive confirmation
        #[arg(long)]
        auto_approve: bool,
    },
    /// Delete every declared resource
    Destroy {
        /// Skip the interactive confirmation
        #[arg(long)]
        auto_approve: bool,
    },
    /// Bring an existing remote object under management
    Import {
        /// Resource address, e.g. network.branch
        address: String,
        /// Remote identifier, e.g. N_24329156 or a device serial
        identifier: String,
    },
    /// Inspect or edit the state file
    State {
        #[command(subcommand)]
        command: StateCommands,
    },
    /// Generate shell completions
    Completions { shell: Shell },
}

#[derive(Subcommand)]
enum StateCommands {
    /// List resources in the state
    List,
    /// Remove a resource from the state without touching the dashboard
    Rm { address: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate => run_validate(&cli.file),
        Commands::Plan => run_plan(&cli.file).await,
        Commands::Apply { auto_approve } => run_apply(&cli.file, auto_approve).await,
        Commands::Destroy { auto_approve } => run_destroy(&cli.file, auto_approve).await,
        Commands::Import {
            address,
            identifier,
        } => run_import(&cli.file, &address, &identifier).await,
        Commands::State { command } => run_state(&cli.file, command).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "volans", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(message) = result {
        eprintln!("{} {}", "Error:".red().bold(), message);
        std::process::exit(1);
    }
}

// =============================================================================
// Schema Validation
// =============================================================================

fn get_schemas() -> HashMap<String, ResourceSchema> {
    volans_provider_meraki::resources::resource_types()
        .into_iter()
        .map(|t| (t.name().to_string(), t.schema()))
        .collect()
}

fn validate_resources(resources: &[Resource]) -> Result<(), String> {
    let schemas = get_schemas();
    let mut errors = Vec::new();

    for resource in resources {
        let Some(schema) = schemas.get(&resource.id.resource_type) else {
            errors.push(format!(
                "{}: unknown resource type '{}'",
                resource.id, resource.id.resource_type
            ));
            continue;
        };

        if let Err(type_errors) = schema.validate(&resource.attributes) {
            for e in type_errors {
                errors.push(format!("{}: {}", resource.id, e));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "Validation failed:\n  {}",
            errors.join("\n  ")
        ))
    }
}

fn run_validate(file: &PathBuf) -> Result<(), String> {
    let parsed = load_declarations(file)?;
    let resources = to_resources(&parsed);
    validate_resources(&resources)?;

    println!(
        "{}",
        format!(
            "Valid: {} resources, {} data sources.",
            parsed.resources.len(),
            parsed.data.len()
        )
        .green()
    );
    Ok(())
}

// =============================================================================
// Provider / Backend Construction
// =============================================================================

fn build_provider(settings: &ProviderSettings) -> Result<MerakiProvider, String> {
    let mut config = ProviderConfig::resolve(settings.api_key.clone())
        .map_err(|e| e.to_string())?;

    if let Some(base_url) = &settings.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(organization_id) = &settings.organization_id {
        config = config.with_organization_id(organization_id.clone());
    }
    if let Some(timeout_secs) = settings.timeout_secs {
        config = config.with_timeout(std::time::Duration::from_secs(timeout_secs));
    }

    MerakiProvider::new(config).map_err(|e| e.to_string())
}

async fn build_backend(parsed: &DeclarationFile) -> Result<Box<dyn StateBackend>, String> {
    let config = match &parsed.backend {
        Some(settings) => BackendConfig {
            backend_type: settings.backend_type.clone(),
            attributes: settings.attributes.clone(),
        },
        None => BackendConfig {
            backend_type: "local".to_string(),
            attributes: HashMap::new(),
        },
    };

    create_backend(&config).await.map_err(|e| e.to_string())
}

async fn load_state(backend: &dyn StateBackend) -> Result<StateFile, String> {
    Ok(backend
        .read_state()
        .await
        .map_err(|e| e.to_string())?
        .unwrap_or_default())
}

// =============================================================================
// Reference Resolution and Ordering
// =============================================================================

type BindingMap = HashMap<String, HashMap<String, Value>>;

fn resolve_ref_value(value: &Value, bindings: &BindingMap) -> Value {
    match value {
        Value::Ref(binding, attribute) => bindings
            .get(binding)
            .and_then(|attrs| attrs.get(attribute))
            .cloned()
            .unwrap_or_else(|| value.clone()),
        Value::List(items) => Value::List(
            items
                .iter()
                .map(|item| resolve_ref_value(item, bindings))
                .collect(),
        ),
        Value::Map(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), resolve_ref_value(v, bindings)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn resolve_resource_refs(resource: &Resource, bindings: &BindingMap) -> Resource {
    let mut resolved = resource.clone();
    for (key, value) in &resource.attributes {
        resolved
            .attributes
            .insert(key.clone(), resolve_ref_value(value, bindings));
    }
    resolved
}

fn collect_dependencies(value: &Value, deps: &mut HashSet<String>) {
    match value {
        Value::Ref(binding, _) => {
            deps.insert(binding.clone());
        }
        Value::List(items) => {
            for item in items {
                collect_dependencies(item, deps);
            }
        }
        Value::Map(map) => {
            for v in map.values() {
                collect_dependencies(v, deps);
            }
        }
        _ => {}
    }
}

fn resource_dependencies(resource: &Resource) -> HashSet<String> {
    let mut deps = HashSet::new();
    for value in resource.attributes.values() {
        collect_dependencies(value, &mut deps);
    }
    deps
}

/// Topologically sort resources so referenced resources apply first
fn sort_resources_by_dependencies(resources: &[Resource]) -> Vec<Resource> {
    let by_name: HashMap<&str, &Resource> = resources
        .iter()
        .map(|r| (r.id.name.as_str(), r))
        .collect();

    let mut sorted = Vec::new();
    let mut visited = HashSet::new();

    fn visit<'a>(
        resource: &'a Resource,
        by_name: &HashMap<&str, &'a Resource>,
        visited: &mut HashSet<String>,
        sorted: &mut Vec<Resource>,
    ) {
        if visited.contains(&resource.id.name) {
            return;
        }
        visited.insert(resource.id.name.clone());

        for dep in resource_dependencies(resource) {
            if let Some(dep_resource) = by_name.get(dep.as_str()) {
                visit(dep_resource, by_name, visited, sorted);
            }
        }

        sorted.push(resource.clone());
    }

    for resource in resources {
        visit(resource, &by_name, &mut visited, &mut sorted);
    }

    sorted
}

// =============================================================================
// Refresh
// =============================================================================

/// Read the current state of every declared resource
///
/// A resource that is tracked in the state file but reads back as gone
/// is drift: warn and drop it from state (the dashboard is
/// authoritative).
async fn refresh_states(
    provider: &MerakiProvider,
    resources: &[Resource],
    state_file: &mut StateFile,
) -> Result<HashMap<ResourceId, State>, String> {
    let mut current_states = HashMap::new();

    for resource in resources {
        if resource.is_data_source() {
            continue;
        }

        let tracked = state_file.find_resource(&resource.id.resource_type, &resource.id.name);
        let identifier = tracked.and_then(|r| r.identifier.clone());
        let stored: HashMap<String, Value> = tracked
            .map(|r| {
                r.attributes
                    .iter()
                    .map(|(k, v)| (k.clone(), json_to_value(v)))
                    .collect()
            })
            .unwrap_or_default();

        let mut state = provider
            .read(resource, identifier.as_deref())
            .await
            .map_err(|e| format!("Failed to read state: {}", e))?;

        // The dashboard never echoes write-only fields (psk, RADIUS
        // secrets); the stored values fill the holes so they don't
        // read as drift.
        if state.exists && !stored.is_empty() {
            state.attributes = merge_maps(&stored, &state.attributes);
        }

        if !state.exists && identifier.is_some() {
            println!(
                "{}",
                format!(
                    "Warning: {} is gone on the dashboard, removing from state",
                    resource.id
                )
                .yellow()
            );
            state_file.remove_resource(&resource.id.resource_type, &resource.id.name);
        }

        current_states.insert(resource.id.clone(), state);
    }

    Ok(current_states)
}

/// Seed the binding map from declared attributes plus live state
fn build_binding_map(
    resources: &[Resource],
    current_states: &HashMap<ResourceId, State>,
) -> BindingMap {
    let mut bindings = BindingMap::new();

    for resource in resources {
        let mut attrs = resource.attributes.clone();
        if let Some(state) = current_states.get(&resource.id)
            && state.exists
        {
            for (k, v) in &state.attributes {
                attrs.entry(k.clone()).or_insert_with(|| v.clone());
            }
        }
        bindings.insert(resource.id.name.clone(), attrs);
    }

    bindings
}

/// Plan Delete effects for state entries that are no longer declared
fn plan_removed_resources(
    plan: &mut Plan,
    resources: &[Resource],
    state_file: &StateFile,
) {
    let declared: HashSet<(String, String)> = resources
        .iter()
        .filter(|r| !r.is_data_source())
        .map(|r| (r.id.resource_type.clone(), r.id.name.clone()))
        .collect();

    for tracked in &state_file.resources {
        if tracked.protected {
            continue;
        }
        if !declared.contains(&(tracked.resource_type.clone(), tracked.name.clone())) {
            plan.add(Effect::Delete(ResourceId::new(
                tracked.resource_type.clone(),
                tracked.name.clone(),
            )));
        }
    }
}

// =============================================================================
// Plan
// =============================================================================

async fn run_plan(file: &PathBuf) -> Result<(), String> {
    let parsed = load_declarations(file)?;
    let resources = to_resources(&parsed);
    validate_resources(&resources)?;

    let provider = build_provider(&parsed.provider)?;
    let backend = build_backend(&parsed).await?;
    let mut state_file = load_state(backend.as_ref()).await?;

    let sorted = sort_resources_by_dependencies(&resources);
    let current_states = refresh_states(&provider, &sorted, &mut state_file).await?;

    let bindings = build_binding_map(&sorted, &current_states);
    let resolved: Vec<Resource> = sorted
        .iter()
        .map(|r| resolve_resource_refs(r, &bindings))
        .collect();

    let mut plan = create_plan(&resolved, &current_states);
    plan_removed_resources(&mut plan, &resolved, &state_file);

    print_plan(&plan, &current_states);
    Ok(())
}

// =============================================================================
// Apply
// =============================================================================

async fn run_apply(file: &PathBuf, auto_approve: bool) -> Result<(), String> {
    let parsed = load_declarations(file)?;
    let resources = to_resources(&parsed);
    validate_resources(&resources)?;

    let provider = build_provider(&parsed.provider)?;
    let backend = build_backend(&parsed).await?;
    backend.init().await.map_err(|e| e.to_string())?;

    let lock = backend
        .acquire_lock("apply")
        .await
        .map_err(|e| e.to_string())?;
    tracing::debug!("acquired state lock {}", lock.id);

    let result = apply_locked(&resources, &provider, backend.as_ref(), auto_approve).await;

    backend.release_lock(&lock).await.map_err(|e| e.to_string())?;
    result
}

async fn apply_locked(
    resources: &[Resource],
    provider: &MerakiProvider,
    backend: &dyn StateBackend,
    auto_approve: bool,
) -> Result<(), String> {
    let mut state_file = load_state(backend).await?;
    let tracked_before = state_file.resources.len();

    let sorted = sort_resources_by_dependencies(resources);
    let current_states = refresh_states(provider, &sorted, &mut state_file).await?;
    let drifted = state_file.resources.len() != tracked_before;

    let mut bindings = build_binding_map(&sorted, &current_states);
    let resolved: Vec<Resource> = sorted
        .iter()
        .map(|r| resolve_resource_refs(r, &bindings))
        .collect();

    let mut plan = create_plan(&resolved, &current_states);
    plan_removed_resources(&mut plan, &resolved, &state_file);

    if plan.is_empty() {
        println!("{}", "No changes needed.".green());
        // Persist any drift removals picked up during refresh
        if drifted {
            state_file.increment_serial();
            backend.write_state(&state_file).await.map_err(|e| e.to_string())?;
        }
        return Ok(());
    }

    print_plan(&plan, &current_states);
    println!();

    if plan.mutation_count() > 0 && !auto_approve && !confirm("Apply these changes?")? {
        println!("{}", "Apply cancelled.".yellow());
        return Ok(());
    }

    println!("{}", "Applying changes...".cyan().bold());
    println!();

    let mut success_count = 0;
    let mut failure_count = 0;

    for effect in plan.effects() {
        match effect {
            Effect::Read(id) => {
                // Data source refresh
                let Some(resource) = resolved.iter().find(|r| &r.id == id) else {
                    continue;
                };
                let resource = resolve_resource_refs(resource, &bindings);
                match provider.read(&resource, None).await {
                    Ok(state) => {
                        println!("  {} {}", "✓".green(), format_effect(effect));
                        success_count += 1;
                        bindings.insert(id.name.clone(), state.attributes);
                    }
                    Err(e) => {
                        println!("  {} {} - {}", "✗".red(), format_effect(effect), e);
                        failure_count += 1;
                    }
                }
            }
            Effect::Create(resource) => {
                let resolved_resource = resolve_resource_refs(resource, &bindings);

                match provider.create(&resolved_resource).await {
                    Ok(state) => {
                        println!("  {} {}", "✓".green(), format_effect(effect));
                        success_count += 1;

                        state_file.upsert_resource(resource_state_from(&state));
                        let mut attrs = resolved_resource.attributes.clone();
                        attrs.extend(state.attributes.clone());
                        bindings.insert(resource.id.name.clone(), attrs);
                    }
                    Err(e) => {
                        println!("  {} {} - {}", "✗".red(), format_effect(effect), e);
                        failure_count += 1;
                    }
                }
            }
            Effect::Update { id, from, to } => {
                let resolved_to = resolve_resource_refs(to, &bindings);
                let Some(identifier) = state_identifier(&state_file, id, from) else {
                    println!(
                        "  {} {} - no identifier in state, cannot update",
                        "✗".red(),
                        format_effect(effect)
                    );
                    failure_count += 1;
                    continue;
                };

                match provider.update(id, &identifier, from, &resolved_to).await {
                    Ok(state) => {
                        println!("  {} {}", "✓".green(), format_effect(effect));
                        success_count += 1;

                        state_file.upsert_resource(resource_state_from(&state));
                        let mut attrs = resolved_to.attributes.clone();
                        attrs.extend(state.attributes.clone());
                        bindings.insert(id.name.clone(), attrs);
                    }
                    Err(e) => {
                        println!("  {} {} - {}", "✗".red(), format_effect(effect), e);
                        failure_count += 1;
                    }
                }
            }
            Effect::Delete(id) => {
                let Some(identifier) = state_identifier(&state_file, id, &State::not_found(id.clone()))
                else {
                    // Nothing tracked; forget it
                    state_file.remove_resource(&id.resource_type, &id.name);
                    continue;
                };

                match provider.delete(id, &identifier).await {
                    Ok(()) => {
                        println!("  {} {}", "✓".green(), format_effect(effect));
                        success_count += 1;
                        state_file.remove_resource(&id.resource_type, &id.name);
                    }
                    Err(e) => {
                        println!("  {} {} - {}", "✗".red(), format_effect(effect), e);
                        failure_count += 1;
                    }
                }
            }
        }
    }

    state_file.increment_serial();
    backend.write_state(&state_file).await.map_err(|e| e.to_string())?;

    println!();
    if failure_count == 0 {
        println!(
            "{}",
            format!("Apply complete! {} changes applied.", success_count)
                .green()
                .bold()
        );
        Ok(())
    } else {
        Err(format!(
            "Apply finished with failures: {} succeeded, {} failed.",
            success_count, failure_count
        ))
    }
}

// =============================================================================
// Destroy
// =============================================================================

async fn run_destroy(file: &PathBuf, auto_approve: bool) -> Result<(), String> {
    let parsed = load_declarations(file)?;
    let resources = to_resources(&parsed);

    let provider = build_provider(&parsed.provider)?;
    let backend = build_backend(&parsed).await?;

    let lock = backend
        .acquire_lock("destroy")
        .await
        .map_err(|e| e.to_string())?;
    tracing::debug!("acquired state lock {}", lock.id);

    let result = destroy_locked(&resources, &provider, backend.as_ref(), auto_approve).await;

    backend.release_lock(&lock).await.map_err(|e| e.to_string())?;
    result
}

async fn destroy_locked(
    resources: &[Resource],
    provider: &MerakiProvider,
    backend: &dyn StateBackend,
    auto_approve: bool,
) -> Result<(), String> {
    let mut state_file = load_state(backend).await?;

    // Referenced resources must outlive their dependents: destroy in
    // reverse apply order.
    let mut ordered: Vec<Resource> = sort_resources_by_dependencies(resources)
        .into_iter()
        .filter(|r| !r.is_data_source())
        .collect();
    ordered.reverse();

    let targets: Vec<(Resource, String)> = ordered
        .into_iter()
        .filter_map(|resource| {
            let tracked =
                state_file.find_resource(&resource.id.resource_type, &resource.id.name)?;
            if tracked.protected {
                println!(
                    "{}",
                    format!("Skipping protected resource {}", resource.id).yellow()
                );
                return None;
            }
            let identifier = tracked.identifier.clone()?;
            Some((resource, identifier))
        })
        .collect();

    if targets.is_empty() {
        println!("{}", "Nothing to destroy.".green());
        return Ok(());
    }

    println!("{}", "The following resources will be destroyed:".bold());
    for (resource, _) in &targets {
        println!("  {} {}", "-".red(), resource.id);
    }
    println!();

    if !auto_approve && !confirm("Destroy these resources?")? {
        println!("{}", "Destroy cancelled.".yellow());
        return Ok(());
    }

    let mut failure_count = 0;

    for (resource, identifier) in &targets {
        match provider.delete(&resource.id, identifier).await {
            Ok(()) => {
                println!("  {} {}", "✓".green(), resource.id);
                state_file.remove_resource(&resource.id.resource_type, &resource.id.name);
            }
            Err(e) => {
                println!("  {} {} - {}", "✗".red(), resource.id, e);
                failure_count += 1;
            }
        }
    }

    state_file.increment_serial();
    backend.write_state(&state_file).await.map_err(|e| e.to_string())?;

    if failure_count == 0 {
        println!();
        println!("{}", "Destroy complete!".green().bold());
        Ok(())
    } else {
        Err(format!("Destroy finished with {} failures.", failure_count))
    }
}

// =============================================================================
// Import
// =============================================================================

async fn run_import(file: &PathBuf, address: &str, identifier: &str) -> Result<(), String> {
    let parsed = load_declarations(file)?;
    let resources = to_resources(&parsed);

    let (resource_type, name) = address
        .split_once('.')
        .ok_or_else(|| format!("Invalid address '{}', expected type.name", address))?;

    let resource = resources
        .iter()
        .find(|r| r.id.resource_type == resource_type && r.id.name == name)
        .ok_or_else(|| format!("Address '{}' is not declared in {}", address, file.display()))?;

    if resource.is_data_source() {
        return Err("Data sources are not tracked in state".to_string());
    }

    let provider = build_provider(&parsed.provider)?;
    let backend = build_backend(&parsed).await?;

    let lock = backend
        .acquire_lock("import")
        .await
        .map_err(|e| e.to_string())?;

    let result = async {
        let mut state_file = load_state(backend.as_ref()).await?;

        let state = provider
            .read(resource, Some(identifier))
            .await
            .map_err(|e| e.to_string())?;

        if !state.exists {
            return Err(format!(
                "No remote object found for {} with identifier '{}'",
                address, identifier
            ));
        }

        state_file.upsert_resource(resource_state_from(&state));
        state_file.increment_serial();
        backend
            .write_state(&state_file)
            .await
            .map_err(|e| e.to_string())?;

        println!(
            "{}",
            format!("Imported {} (identifier {}).", address, identifier).green()
        );
        Ok(())
    }
    .await;

    backend.release_lock(&lock).await.map_err(|e| e.to_string())?;
    result
}

// =============================================================================
// State Commands
// =============================================================================

async fn run_state(file: &PathBuf, command: StateCommands) -> Result<(), String> {
    let parsed = load_declarations(file)?;
    let backend = build_backend(&parsed).await?;
    let mut state_file = load_state(backend.as_ref()).await?;

    match command {
        StateCommands::List => {
            if state_file.resources.is_empty() {
                println!("State is empty.");
                return Ok(());
            }
            for resource in &state_file.resources {
                let identifier = resource.identifier.as_deref().unwrap_or("-");
                println!(
                    "{}.{} ({})",
                    resource.resource_type, resource.name, identifier
                );
            }
            Ok(())
        }
        StateCommands::Rm { address } => {
            let (resource_type, name) = address
                .split_once('.')
                .ok_or_else(|| format!("Invalid address '{}', expected type.name", address))?;

            if state_file.remove_resource(resource_type, name).is_none() {
                return Err(format!("'{}' is not tracked in state", address));
            }

            state_file.increment_serial();
            backend
                .write_state(&state_file)
                .await
                .map_err(|e| e.to_string())?;

            println!("{}", format!("Removed {} from state.", address).green());
            Ok(())
        }
    }
}

// =============================================================================
// Display Helpers
// =============================================================================

fn print_plan(plan: &Plan, current_states: &HashMap<ResourceId, State>) {
    if plan.is_empty() {
        println!("{}", "No changes needed.".green());
        return;
    }

    println!("{}", "Volans Plan".bold());
    println!();

    for effect in plan.effects() {
        match effect {
            Effect::Read(id) => {
                println!("  {} {}", "?".cyan(), format!("{}", id).cyan());
            }
            Effect::Create(resource) => {
                println!("  {} {}", "+".green(), format!("{}", resource.id).green());
                let mut keys: Vec<_> = resource
                    .attributes
                    .keys()
                    .filter(|k| !k.starts_with('_'))
                    .collect();
                keys.sort();
                for key in keys {
                    println!(
                        "      {} = {}",
                        key,
                        format_value(&resource.attributes[key.as_str()])
                    );
                }
            }
            Effect::Update { id, from, to } => {
                println!("  {} {}", "~".yellow(), format!("{}", id).yellow());
                let current = current_states
                    .get(id)
                    .map(|s| &s.attributes)
                    .unwrap_or(&from.attributes);
                print_attribute_diff(&to.attributes, current);
            }
            Effect::Delete(id) => {
                println!("  {} {}", "-".red(), format!("{}", id).red());
            }
        }
    }

    println!();
    println!("{}", plan.summary());
}

/// Per-attribute diff for updates; structured values diff line-wise
fn print_attribute_diff(desired: &HashMap<String, Value>, current: &HashMap<String, Value>) {
    let mut keys: Vec<_> = desired.keys().filter(|k| !k.starts_with('_')).collect();
    keys.sort();

    for key in keys {
        let desired_value = &desired[key.as_str()];
        match current.get(key) {
            Some(current_value) if current_value == desired_value => {}
            Some(current_value) => match (current_value, desired_value) {
                (Value::Map(_) | Value::List(_), _) | (_, Value::Map(_) | Value::List(_)) => {
                    println!("      {}:", key);
                    let old = pretty_value(current_value);
                    let new = pretty_value(desired_value);
                    let diff = similar::TextDiff::from_lines(old.as_str(), new.as_str());
                    for change in diff.iter_all_changes() {
                        match change.tag() {
                            similar::ChangeTag::Delete => {
                                print!("        {}", format!("- {}", change).red());
                            }
                            similar::ChangeTag::Insert => {
                                print!("        {}", format!("+ {}", change).green());
                            }
                            similar::ChangeTag::Equal => {}
                        }
                    }
                }
                _ => {
                    println!(
                        "      {}: {} -> {}",
                        key,
                        format_value(current_value).red(),
                        format_value(desired_value).green()
                    );
                }
            },
            None => {
                println!(
                    "      {} = {}",
                    key,
                    format_value(desired_value).green()
                );
            }
        }
    }
}

fn format_effect(effect: &Effect) -> String {
    match effect {
        Effect::Create(r) => format!("+ {}", r.id),
        Effect::Update { id, .. } => format!("~ {}", id),
        Effect::Delete(id) => format!("- {}", id),
        Effect::Read(id) => format!("? {}", id),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Int(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Ref(binding, attribute) => format!("${{{}.{}}}", binding, attribute),
        Value::List(_) | Value::Map(_) => pretty_value(value).trim_end().to_string(),
    }
}

fn pretty_value(value: &Value) -> String {
    serde_json::to_string_pretty(&value_to_json(value)).unwrap_or_else(|_| "<opaque>".to_string())
}

// =============================================================================
// State Conversion
// =============================================================================

fn resource_state_from(state: &State) -> ResourceState {
    let mut resource_state = ResourceState::new(
        state.id.resource_type.clone(),
        state.id.name.clone(),
        PROVIDER_NAME,
    );

    if let Some(identifier) = &state.identifier {
        resource_state = resource_state.with_identifier(identifier.clone());
    }

    for (key, value) in &state.attributes {
        resource_state
            .attributes
            .insert(key.clone(), value_to_json(value));
    }

    resource_state
}

/// Identifier for an effect's target: state file first, then the
/// refreshed State (covers resources created earlier in this run)
fn state_identifier(state_file: &StateFile, id: &ResourceId, from: &State) -> Option<String> {
    state_file
        .find_resource(&id.resource_type, &id.name)
        .and_then(|r| r.identifier.clone())
        .or_else(|| from.identifier.clone())
}

fn confirm(prompt: &str) -> Result<bool, String> {
    print!("{} [y/N]: ", prompt);
    std::io::stdout()
        .flush()
        .map_err(|e| format!("Failed to flush stdout: {}", e))?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .map_err(|e| format!("Failed to read answer: {}", e))?;

    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
