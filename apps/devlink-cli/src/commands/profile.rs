//! Profile commands: update, show

use devlink_proto::{ProfileRecord, PublicProfile};

use crate::cli::UpdateArgs;
use crate::client::GrpcProfileTransport;
use crate::config::CliConfig;
use crate::form::{encode_update_request, read_attachment, ProfileForm};
use crate::state::ProfileStore;

pub async fn cmd_profile_update(
    server: &str,
    args: UpdateArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::load()?;
    let session = config.session()?;

    let picture = match &args.picture {
        Some(path) => Some(read_attachment(path)?),
        None => None,
    };

    let form = ProfileForm {
        first_name: args.first_name,
        last_name: args.last_name,
        about: args.about,
        skills: args.skills,
        experience: args.experience,
        education: args.education,
        linkedin: args.linkedin,
        github: args.github,
        picture,
    };
    let request = encode_update_request(&form)?;

    let transport = GrpcProfileTransport::new(server.to_string(), session.token.clone());
    let store = ProfileStore::new(transport);

    let record = store.submit(request).await?;

    println!("✓ Profile updated!");
    print_record(&record);
    Ok(())
}

pub async fn cmd_profile_show(
    server: &str,
    user_id: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    use crate::client::ProfileTransport;

    let config = CliConfig::load()?;
    let session = config.session()?;

    let user_id = user_id.unwrap_or(&session.user_id);
    let transport = GrpcProfileTransport::new(server.to_string(), session.token.clone());

    let profile = transport.get_profile(user_id).await?;
    print_public_profile(&profile);
    Ok(())
}

fn print_line(label: &str, value: &str) {
    if !value.is_empty() {
        println!("{:<12}{}", label, value);
    }
}

fn print_record(record: &ProfileRecord) {
    print_line("Username:", &record.username);
    print_line("Email:", &record.email);
    print_line(
        "Name:",
        format!("{} {}", record.first_name, record.last_name).trim(),
    );
    print_line("About:", &record.about);
    print_line("Skills:", &record.skills.join(", "));
    print_line("Experience:", &record.experience);
    print_line("Education:", &record.education);
    print_line("LinkedIn:", &record.linkedin);
    print_line("GitHub:", &record.github);
    print_line("Picture:", &record.profile_picture);
}

fn print_public_profile(profile: &PublicProfile) {
    print_line("Username:", &profile.username);
    print_line(
        "Name:",
        format!("{} {}", profile.first_name, profile.last_name).trim(),
    );
    print_line("About:", &profile.about);
    print_line("Skills:", &profile.skills.join(", "));
    print_line("Experience:", &profile.experience);
    print_line("Education:", &profile.education);
    print_line("LinkedIn:", &profile.linkedin);
    print_line("GitHub:", &profile.github);
    print_line("Picture:", &profile.profile_picture);
    print_line("Projects:", &profile.project_ids.join(", "));
    print_line("Tasks:", &profile.task_ids.join(", "));
}
