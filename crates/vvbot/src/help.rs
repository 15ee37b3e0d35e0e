//! Usage text sent when the bot is mentioned without a usable query.

/// Fixed help reply, sent byte for byte.
pub const HELP_MESSAGE: &str = "Usage: 
@<bot-nickname> vv <keywords>

A bot for searching 张维为 quote picture according to given keywords.

Description:
    vv <keywords>    Searches for an image based on the keywords and sends it to the group.

Example:
    @<bot-nickname> vv cute cat

Note:
    Longer keywords for better results!
";
