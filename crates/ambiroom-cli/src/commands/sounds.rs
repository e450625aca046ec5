use ambiroom_core::sound::default_catalog;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = default_catalog();
    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }
    for sound in &catalog {
        println!("{:<12} {:<12} {}", sound.id, sound.name, sound.category);
    }
    Ok(())
}
