pub mod networks {
    pub const MAINNET: u64 = 1;
    pub const FLARE: u64 = 14;
    pub const COSTON: u64 = 16;
    pub const SONGBIRD: u64 = 19;
    pub const OPTIMISM: u64 = 10;
    pub const GNOSIS: u64 = 100;
    pub const COSTON2: u64 = 114;
    pub const POLYGON: u64 = 137;
    pub const BASE: u64 = 8453;
    pub const ARBITRUM_ONE: u64 = 42161;
    pub const SEPOLIA: u64 = 11155111;

    /// Etherscan v2 serves every chain it supports from one endpoint, the
    /// chain is selected with the `chainid` query parameter.
    const ETHERSCAN_V2_API: &str = "https://api.etherscan.io/v2/api";

    /// Block explorer with an Etherscan-compatible contract API.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Explorer {
        pub api_url: &'static str,
        pub browser_url: &'static str,
    }

    /// Returns the default explorer for a chain, if one is known.
    pub fn explorer(chain_id: u64) -> Option<Explorer> {
        let (api_url, browser_url) = match chain_id {
            MAINNET => (ETHERSCAN_V2_API, "https://etherscan.io"),
            SEPOLIA => (ETHERSCAN_V2_API, "https://sepolia.etherscan.io"),
            OPTIMISM => (ETHERSCAN_V2_API, "https://optimistic.etherscan.io"),
            GNOSIS => (ETHERSCAN_V2_API, "https://gnosisscan.io"),
            POLYGON => (ETHERSCAN_V2_API, "https://polygonscan.com"),
            BASE => (ETHERSCAN_V2_API, "https://basescan.org"),
            ARBITRUM_ONE => (ETHERSCAN_V2_API, "https://arbiscan.io"),
            FLARE => (
                "https://flare-explorer.flare.network/api",
                "https://flare-explorer.flare.network",
            ),
            SONGBIRD => (
                "https://songbird-explorer.flare.network/api",
                "https://songbird-explorer.flare.network",
            ),
            COSTON => (
                "https://coston-explorer.flare.network/api",
                "https://coston-explorer.flare.network",
            ),
            COSTON2 => (
                "https://coston2-explorer.flare.network/api",
                "https://coston2-explorer.flare.network",
            ),
            _ => return None,
        };
        Some(Explorer {
            api_url,
            browser_url,
        })
    }
}

alloy::sol! {
    #[sol(all_derives)]
    contract ConcertTicket {
        struct Concert {
            string name;
            string location;
            string description;
            uint256 startTime;
            uint256 endTime;
            uint256 totalTickets;
            uint256 ticketsSold;
        }

        constructor(Concert memory concert);
    }
}

use alloy::{
    primitives::{Bytes, U256},
    sol_types::SolConstructor,
};

impl ConcertTicket::Concert {
    /// The concert every deployment is created with.
    pub fn fixture() -> Self {
        Self {
            name: "Concert".to_string(),
            location: "London".to_string(),
            description: "A concert".to_string(),
            startTime: U256::from(1701169200u64),
            endTime: U256::from(1701183600u64),
            totalTickets: U256::from(1000u64),
            ticketsSold: U256::ZERO,
        }
    }

    /// Describes values the contract accepts but that are unlikely to be
    /// intended. Nothing here prevents a deployment.
    pub fn sanity_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.endTime <= self.startTime {
            warnings.push(format!(
                "end time {} is not after start time {}",
                self.endTime, self.startTime
            ));
        }
        if self.ticketsSold > self.totalTickets {
            warnings.push(format!(
                "{} tickets sold exceed the capacity of {}",
                self.ticketsSold, self.totalTickets
            ));
        }
        warnings
    }
}

/// ABI encoded arguments of `constructor(Concert)`, without the creation code.
pub fn constructor_args(concert: &ConcertTicket::Concert) -> Bytes {
    ConcertTicket::constructorCall {
        concert: concert.clone(),
    }
    .abi_encode()
    .into()
}
