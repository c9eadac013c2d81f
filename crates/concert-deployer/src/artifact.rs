//! Reading of Hardhat compilation output.
//!
//! Hardhat writes one artifact per contract
//! (`artifacts/<source>/<Contract>.json`) holding the creation bytecode, and
//! next to it a debug file (`<Contract>.dbg.json`) pointing to the build info
//! of the compilation that produced it. The build info carries the exact
//! compiler version and the standard JSON input, which explorers need to
//! reproduce the bytecode.

use {
    alloy::primitives::Bytes,
    anyhow::{Context, Result, ensure},
    serde::Deserialize,
    std::path::{Path, PathBuf},
};

#[derive(Debug, Clone)]
pub struct Artifact {
    pub contract_name: String,
    pub source_name: String,
    pub bytecode: Bytes,
    path: PathBuf,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtifactFile {
    contract_name: String,
    source_name: String,
    bytecode: Bytes,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DebugFile {
    build_info: PathBuf,
}

/// The parts of a Hardhat build info file needed for source verification.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    /// Full solc version, e.g. `0.8.19+commit.7dd6d404`.
    pub solc_long_version: String,
    /// Standard JSON input the contract was compiled from.
    pub input: serde_json::Value,
}

impl Artifact {
    pub fn load(path: &Path) -> Result<Self> {
        let file: ArtifactFile = read_json(path)?;
        ensure!(
            !file.bytecode.is_empty(),
            "artifact {} has no creation bytecode, is {} abstract or an interface?",
            path.display(),
            file.contract_name,
        );
        tracing::debug!(
            contract = file.contract_name,
            source = file.source_name,
            bytecode_len = file.bytecode.len(),
            "loaded artifact"
        );

        Ok(Self {
            contract_name: file.contract_name,
            source_name: file.source_name,
            bytecode: file.bytecode,
            path: path.to_owned(),
        })
    }

    /// `<source>:<contract>`, the name explorers use to pick the contract out
    /// of a multi-file compilation.
    pub fn fully_qualified_name(&self) -> String {
        format!("{}:{}", self.source_name, self.contract_name)
    }

    /// Creation transaction input: bytecode followed by the encoded
    /// constructor arguments.
    pub fn deploy_code(&self, constructor_args: &[u8]) -> Bytes {
        [&self.bytecode[..], constructor_args].concat().into()
    }

    /// Resolves the build info through the artifact's debug file.
    pub fn build_info(&self) -> Result<BuildInfo> {
        let debug_path = self.path.with_extension("dbg.json");
        let debug: DebugFile = read_json(&debug_path)?;
        let build_info_path = debug_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(debug.build_info);
        read_json(&build_info_path)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read(path).with_context(|| format!("could not read {}", path.display()))?;
    serde_json::from_slice(&content).with_context(|| format!("malformed {}", path.display()))
}

#[cfg(test)]
pub(crate) mod tests {
    use {super::*, serde_json::json};

    pub const BYTECODE: &str = "0x6080604052348015600f57600080fd5b50";
    pub const SOLC_LONG_VERSION: &str = "0.8.19+commit.7dd6d404";

    /// Writes a Hardhat style output tree into `root` and returns the path of
    /// the ConcertTicket artifact.
    pub fn write_hardhat_output(root: &Path) -> PathBuf {
        let artifact_dir = root.join("artifacts/contracts/ConcertTicket.sol");
        let build_info_dir = root.join("artifacts/build-info");
        std::fs::create_dir_all(&artifact_dir).unwrap();
        std::fs::create_dir_all(&build_info_dir).unwrap();

        let artifact = artifact_dir.join("ConcertTicket.json");
        std::fs::write(
            &artifact,
            json!({
                "_format": "hh-sol-artifact-1",
                "contractName": "ConcertTicket",
                "sourceName": "contracts/ConcertTicket.sol",
                "abi": [],
                "bytecode": BYTECODE,
                "deployedBytecode": "0x",
                "linkReferences": {},
                "deployedLinkReferences": {},
            })
            .to_string(),
        )
        .unwrap();
        std::fs::write(
            artifact_dir.join("ConcertTicket.dbg.json"),
            json!({
                "_format": "hh-sol-dbg-1",
                "buildInfo": "../../build-info/5f1c.json",
            })
            .to_string(),
        )
        .unwrap();
        std::fs::write(
            build_info_dir.join("5f1c.json"),
            json!({
                "_format": "hh-sol-build-info-1",
                "solcVersion": "0.8.19",
                "solcLongVersion": SOLC_LONG_VERSION,
                "input": {
                    "language": "Solidity",
                    "sources": {
                        "contracts/ConcertTicket.sol": { "content": "contract ConcertTicket {}" }
                    },
                    "settings": { "optimizer": { "enabled": false, "runs": 200 } }
                },
                "output": {},
            })
            .to_string(),
        )
        .unwrap();

        artifact
    }

    #[test]
    fn loads_artifact_and_build_info() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = Artifact::load(&write_hardhat_output(dir.path())).unwrap();

        assert_eq!(artifact.contract_name, "ConcertTicket");
        assert_eq!(
            artifact.fully_qualified_name(),
            "contracts/ConcertTicket.sol:ConcertTicket"
        );
        assert_eq!(artifact.bytecode, BYTECODE.parse::<Bytes>().unwrap());

        let build_info = artifact.build_info().unwrap();
        assert_eq!(build_info.solc_long_version, SOLC_LONG_VERSION);
        assert_eq!(build_info.input["language"], "Solidity");
    }

    #[test]
    fn deploy_code_appends_constructor_args() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = Artifact::load(&write_hardhat_output(dir.path())).unwrap();

        let code = artifact.deploy_code(&[0xaa, 0xbb]);
        assert_eq!(code.len(), artifact.bytecode.len() + 2);
        assert!(code.starts_with(&artifact.bytecode));
        assert_eq!(&code[code.len() - 2..], &[0xaa_u8, 0xbb]);
    }

    #[test]
    fn rejects_interface_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("IConcertTicket.json");
        std::fs::write(
            &path,
            json!({
                "contractName": "IConcertTicket",
                "sourceName": "contracts/IConcertTicket.sol",
                "bytecode": "0x",
            })
            .to_string(),
        )
        .unwrap();

        let err = Artifact::load(&path).unwrap_err();
        assert!(err.to_string().contains("no creation bytecode"));
    }

    #[test]
    fn missing_files_name_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Artifact::load(&dir.path().join("Missing.json")).unwrap_err();
        assert!(err.to_string().contains("Missing.json"));

        let artifact = write_hardhat_output(dir.path());
        std::fs::remove_file(artifact.with_extension("dbg.json")).unwrap();
        let err = Artifact::load(&artifact).unwrap().build_info().unwrap_err();
        assert!(err.to_string().contains("ConcertTicket.dbg.json"));
    }
}
