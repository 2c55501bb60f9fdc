//! Solidity interface of the deployed game contract.

use alloy::sol;

sol! {
    #[sol(rpc)]
    interface IPuffPuffPass {
        function gameStarted() external view returns (bool);
        function gameEnded() external view returns (bool);
        function winner() external view returns (uint32);
        function currentTurnChainSlug() external view returns (uint32);

        function playerCharacterTurnsLeft(uint32 chainSlug, uint256 characterId) external view returns (uint256);
        function playerPowersLeft(uint32 chainSlug, uint256 powerId) external view returns (uint256);
        function chemicalXAmount(uint32 chainSlug) external view returns (uint256);
        function lifeMapping(uint32 chainSlug) external view returns (uint256);

        function setup(uint32 chainSlug, uint256[4] characterIds, uint256[2] powerIds, address optPlayer) external;
        function playWithCharacter(uint32 chainSlug, bool isAttack, uint256 characterId, uint256 powerId) external;
        function refreshLife(uint32[] chainSlugs) external;
    }
}
