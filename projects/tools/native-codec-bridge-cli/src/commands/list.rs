use crate::error::CliError;
use argh::FromArgs;
use native_codec_bridge::registry::codecs;
use native_codec_bridge::{CodecBridge, CodecDescriptor, LibraryKind};

#[derive(FromArgs, Debug)]
/// List every codec, its native symbol and whether it is available
#[argh(subcommand, name = "list")]
pub struct ListCmd {
    /// only list codecs whose library is loaded
    #[argh(switch)]
    pub available: bool,
}

pub fn handle_list_command(cmd: &ListCmd, bridge: &CodecBridge) -> Result<(), CliError> {
    for kind in LibraryKind::ALL {
        match bridge.unavailable_reason(kind) {
            Some(reason) => println!("{kind}: unavailable ({reason})"),
            None => println!("{kind}: loaded"),
        }
    }
    println!();

    for descriptor in listed(cmd, bridge) {
        let available = bridge.is_available(descriptor);
        println!(
            "{:<22} {:<10} {:<34} {}",
            descriptor.name,
            descriptor.direction.name(),
            descriptor.symbol,
            if available { "yes" } else { "no" }
        );
    }
    Ok(())
}

fn listed<'a>(
    cmd: &'a ListCmd,
    bridge: &'a CodecBridge,
) -> impl Iterator<Item = &'static CodecDescriptor> + 'a {
    codecs().filter(|descriptor| !cmd.available || bridge.is_available(descriptor))
}
