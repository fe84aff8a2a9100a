// Match coordinator client
//
// The coordinator drives a game over a plain TCP stream. Every message is
// either the bare word `connected` or a tuple such as `('chooseMove', '0101...')`.
// The player answers each one with a single unterminated reply.
//
//   connected               -> ACK
//   ('getName', 'n')        -> player name
//   ('newGame', None)       -> ACK
//   ('chooseMove', board)   -> edge id
//   ('gameOver', result)    -> ACK, then the session ends

use log::{error, info};
use std::str::FromStr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::board::Board;
use crate::bot::Bot;

pub const ACKNOWLEDGED: &str = "ACK";

/// Largest message read in one go; a board string is 72 bytes
const BUFFER_SIZE: usize = 1025;

/// A message from the coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    Connected,
    GetName,
    NewGame,
    ChooseMove(String),
    GameOver(String),
}

fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Splits `('command', 'data')` into its command and data words.
/// Quotes around the data are optional, so `('newGame', None)` parses too.
pub fn parse_server_message(msg: &str) -> Result<(String, String), String> {
    let invalid = || format!("Unrecognised server message: {}", msg);

    let inner = msg
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(invalid)?;
    let (command, data) = inner.split_once(',').ok_or_else(invalid)?;

    let command = command
        .trim()
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .ok_or_else(invalid)?;
    let data = data.trim();
    let data = data
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(data);

    if !is_word(command) || !is_word(data) {
        return Err(invalid());
    }
    Ok((command.to_string(), data.to_string()))
}

impl FromStr for ServerMessage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "connected" {
            return Ok(ServerMessage::Connected);
        }

        let (command, data) = parse_server_message(s)?;
        match command.as_str() {
            "getName" => Ok(ServerMessage::GetName),
            "newGame" => Ok(ServerMessage::NewGame),
            "chooseMove" => Ok(ServerMessage::ChooseMove(data)),
            "gameOver" => Ok(ServerMessage::GameOver(data)),
            other => Err(format!("Unknown server command: {}", other)),
        }
    }
}

/// Per-connection state
pub struct Session<'a> {
    bot: &'a Bot,
    turn: u32,
    game_over: bool,
}

impl<'a> Session<'a> {
    pub fn new(bot: &'a Bot) -> Self {
        Session {
            bot,
            turn: 0,
            game_over: false,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Builds the reply to one coordinator message
    pub async fn respond(&mut self, message: &ServerMessage) -> Result<String, String> {
        match message {
            ServerMessage::Connected => Ok(ACKNOWLEDGED.to_string()),
            ServerMessage::GetName => Ok(self.bot.name().to_string()),
            ServerMessage::NewGame => {
                info!("New game");
                self.turn = 0;
                Ok(ACKNOWLEDGED.to_string())
            }
            ServerMessage::ChooseMove(board) => {
                let board: Board = board.parse()?;
                self.turn += 1;
                let turn_time = self.bot.config().timing.turn_time();
                let edge = self.bot.decide(board, self.turn, turn_time).await?;
                Ok(edge.to_string())
            }
            ServerMessage::GameOver(result) => {
                info!("GAME IS OVER. Result: {}", result);
                self.game_over = true;
                Ok(ACKNOWLEDGED.to_string())
            }
        }
    }
}

/// Connects to the coordinator and plays until it reports the game over
pub async fn run(bot: &Bot, address: &str, port: u16) -> Result<(), String> {
    info!("Connecting to {}:{}...", address, port);
    let mut stream = TcpStream::connect((address, port))
        .await
        .map_err(|e| format!("Failed to connect to {}:{}: {}", address, port, e))?;

    let mut session = Session::new(bot);
    let mut buffer = vec![0u8; BUFFER_SIZE];

    while !session.is_game_over() {
        let n = stream
            .read(&mut buffer)
            .await
            .map_err(|e| format!("Failed to read from coordinator: {}", e))?;
        if n == 0 {
            return Err("Coordinator closed the connection".to_string());
        }

        let text = String::from_utf8_lossy(&buffer[..n]);
        info!("Server says: {}", text.trim());

        let message = text.parse::<ServerMessage>().map_err(|e| {
            error!("{}", e);
            e
        })?;
        let reply = session.respond(&message).await?;

        stream
            .write_all(reply.as_bytes())
            .await
            .map_err(|e| format!("Failed to write to coordinator: {}", e))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unquoted_data() {
        let (command, data) = parse_server_message("('newGame', None)").unwrap();
        assert_eq!(command, "newGame");
        assert_eq!(data, "None");
    }

    #[test]
    fn test_parse_quoted_data() {
        let (command, data) = parse_server_message("('getName', '1')").unwrap();
        assert_eq!(command, "getName");
        assert_eq!(data, "1");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_server_message("hello").is_err());
        assert!(parse_server_message("('chooseMove')").is_err());
        assert!(parse_server_message("(chooseMove, '01')").is_err());
    }

    #[test]
    fn test_message_kinds() {
        assert_eq!("connected".parse::<ServerMessage>(), Ok(ServerMessage::Connected));
        assert_eq!(
            "('gameOver', 'won')".parse::<ServerMessage>(),
            Ok(ServerMessage::GameOver("won".to_string()))
        );
        assert!("('dance', 'x')".parse::<ServerMessage>().is_err());
    }
}
