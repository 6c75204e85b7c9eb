#![allow(dead_code)]

use snippet_module::{ForgeClient, ForgeConfig};

pub const BOT_PY: &str = "\"\"\"\nGit the lines\n\nA Discord bot that removes embeds and prints out specific lines of code\n\"\"\"\n\nimport asyncio\nimport os\n";

pub const FUNKY_CPP: &str =
    "#include <iostream>\n\nint main() {\n    std::cout << \"Test\\n\";\n    return 0;\n}\n";

/// Config with every forge pointed at the mock server.
pub fn mock_config(server_url: &str) -> ForgeConfig {
    ForgeConfig {
        github_api_base: server_url.to_string(),
        gitlab_api_base: format!("{}/api/v4", server_url),
        heptapod_api_base: format!("{}/heptapod/api/v4", server_url),
        bitbucket_base: format!("{}/bitbucket", server_url),
        ..ForgeConfig::default()
    }
}

pub fn mock_client(server_url: &str) -> ForgeClient {
    ForgeClient::new(mock_config(server_url))
}
