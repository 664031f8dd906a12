//! Solidity type definitions for the contracts the pipeline talks to.

use alloy_sol_types::sol;

sol! {
	/// Identifier derivation on the controlling dApp contract.
	interface IDAppControl {
		function getBackrunUserOpHash(
			bytes32 oppTxHash,
			uint256 oppTxMaxFeePerGas,
			uint256 oppTxMaxPriorityFeePerGas,
			address fastLaneSigner
		) external view returns (bytes32 userOpHash);
	}

	/// Bond accounting on the entrypoint contract.
	interface IAtlas {
		function balanceOfBonded(address account) external view returns (uint256);
		function depositAndBond(uint256 amountToBond) external payable;
	}

	/// Demonstration solver call; stands in for an actual backrun call.
	interface ISolverContract {
		function solve() external;
	}
}
